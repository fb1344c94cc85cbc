use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use mosaic_core::*;
use mosaic_host::*;
use mosaic_ui::*;

/// Prints what a native view would be asked to do.
struct LogView {
    name: String,
    frame: Cell<Rect>,
}

impl RenderableAdapter for LogView {
    fn frame(&self) -> Rect {
        self.frame.get()
    }
    fn set_frame(&self, frame: Rect) {
        log::debug!("{} frame -> {:?}", self.name, frame);
        self.frame.set(frame);
    }
    fn attach(&self, _parent: &Renderable) {
        log::info!("{} attached", self.name);
    }
    fn detach(&self) {
        log::info!("{} detached", self.name);
    }
    fn bring_to_front(&self) {}
}

impl NativeView for LogView {}

#[derive(Default)]
struct Gallery {
    rows: Vec<String>,
    selected: Option<usize>,
}

fn row(registry: &Rc<AdapterRegistry>, key: AdapterKey, title: &str, selected: bool) -> Item {
    let title = title.to_string();
    let template = RenderItem::from_maker(registry.maker(key))
        .with_update(move |_| log::trace!("update {title}"))
        .with_transition(Transition::slide(-40.0, 0.0).with_timing(AnimationTiming::fast()))
        .with_timing(AnimationTiming::default());
    let height = if selected { 64.0 } else { 32.0 };
    Item::new(
        LayoutSize::new(Sizing::Flexible, Sizing::Fixed(height)),
        template,
    )
}

fn gallery(model: &Gallery, registry: &Rc<AdapterRegistry>, key: AdapterKey) -> BoxNode {
    let mut list = VStack(4.0).align(CrossAlign::Stretch);
    for (i, title) in model.rows.iter().enumerate() {
        let selected = model.selected == Some(i);
        list = list.keyed_child(title.clone(), row(registry, key, title, selected));
    }

    let header = Item::fixed(
        Size::new(200.0, 24.0),
        RenderItem::from_maker(registry.maker(key)),
    )
    .fixed_id("header");

    VStack(8.0)
        .child(header)
        .child(list.inset(EdgeInsets::symmetric(12.0, 0.0)).cached())
        .boxed()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting headless gallery");

    let registry = AdapterRegistry::new();
    let made = Rc::new(Cell::new(0));
    let m = made.clone();
    let key = registry.key_for("row", move || {
        Rc::new(move || {
            m.set(m.get() + 1);
            Renderable::view(LogView {
                name: format!("view#{}", m.get()),
                frame: Cell::new(Rect::ZERO),
            })
        }) as AdapterFactory
    });

    let model = Rc::new(RefCell::new(Gallery {
        rows: (1..=12).map(|i| format!("row-{i}")).collect(),
        selected: None,
    }));

    let animator = Rc::new(TickAnimator::new());
    let ticks = TickFlag::new();
    let container = Renderable::view(LogView {
        name: "container".into(),
        frame: Cell::new(Rect::new(0.0, 0.0, 320.0, 240.0)),
    });

    let producer = {
        let model = model.clone();
        let registry = registry.clone();
        move |ctx: &RenderContext| {
            log::debug!("building pass {} in {:?}", ctx.pass, ctx.bounds);
            gallery(&model.borrow(), &registry, key)
        }
    };
    let config = HostConfig::default()
        .visible_bounds_insets(EdgeInsets::all(-16.0))
        .inspector(true);
    let host = RenderHost::new(container, producer, animator.clone(), ticks.clone(), config);

    let settle = |label: &str| {
        while !animator.is_idle() {
            animator.advance(Duration::from_millis(16));
        }
        if ticks.take() {
            host.tick();
        }
        log::info!(
            "{label}: content {:?}, {} mounted, {}",
            host.content_size(),
            host.reconciler().mounted_len(),
            host.inspector_summary().unwrap_or_default()
        );
    };

    host.refresh(false);
    settle("initial");

    host.set_content_offset(Vec2::new(0.0, 180.0));
    settle("scrolled");

    model.borrow_mut().selected = Some(5);
    host.set_needs_refresh(true);
    host.set_needs_refresh(true);
    settle("selected");

    let removed = model.borrow_mut().rows.remove(6);
    host.refresh(true);
    animator.advance(Duration::from_millis(50));
    model.borrow_mut().rows.insert(6, removed);
    host.refresh(true);
    settle("resurrected");

    host.set_bounds(Rect::new(0.0, 0.0, 480.0, 900.0));
    settle("resized");

    host.unmount();
    log::info!(
        "made {} views ({} through the registry)",
        made.get(),
        registry.made_count(key)
    );
    Ok(())
}
