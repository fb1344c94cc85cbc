#[cfg(test)]
mod tests {
    use crate::*;
    use mosaic_core::{
        AnimationTiming, Animator, Completion, Easing, EdgeInsets, ImmediateAnimator,
        NativeView, NodeId, Rect, RenderItem, Renderable, RenderableAdapter, Size, Transition,
        Vec2,
    };
    use mosaic_ui::{HStack, Item, NodeExt, VStack};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecordingView {
        name: &'static str,
        frame: Cell<Rect>,
        log: Log,
    }

    impl RenderableAdapter for RecordingView {
        fn frame(&self) -> Rect {
            self.frame.get()
        }
        fn set_frame(&self, frame: Rect) {
            self.frame.set(frame);
        }
        fn attach(&self, _parent: &Renderable) {
            self.log.borrow_mut().push(format!("attach {}", self.name));
        }
        fn detach(&self) {
            self.log.borrow_mut().push(format!("detach {}", self.name));
        }
        fn bring_to_front(&self) {}
    }

    impl NativeView for RecordingView {}

    struct Container;

    impl RenderableAdapter for Container {
        fn frame(&self) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 100.0)
        }
        fn set_frame(&self, _frame: Rect) {}
        fn attach(&self, _parent: &Renderable) {}
        fn detach(&self) {}
        fn bring_to_front(&self) {}
    }

    impl NativeView for Container {}

    /// Holds completions until the test decides the animation ended.
    #[derive(Default)]
    struct ManualAnimator {
        pending: RefCell<Vec<(Renderable, Rect, Completion)>>,
    }

    impl ManualAnimator {
        fn len(&self) -> usize {
            self.pending.borrow().len()
        }

        fn complete_all(&self) {
            let pending = std::mem::take(&mut *self.pending.borrow_mut());
            for (r, to, completion) in pending {
                if !completion.is_cancelled() {
                    r.snap_frame(to);
                }
                completion.fire();
            }
        }
    }

    impl Animator for ManualAnimator {
        fn animate(
            &self,
            renderable: &Renderable,
            from: Rect,
            to: Rect,
            _timing: &AnimationTiming,
            completion: Completion,
        ) {
            renderable.snap_frame(from);
            self.pending
                .borrow_mut()
                .push((renderable.clone(), to, completion));
        }

        fn cancel(&self, renderable: &Renderable) {
            let stopped: Vec<_> = {
                let mut pending = self.pending.borrow_mut();
                let (stopped, running): (Vec<_>, Vec<_>) = pending
                    .drain(..)
                    .partition(|(r, _, _)| r.ptr_eq(renderable));
                *pending = running;
                stopped
            };
            for (_, _, completion) in stopped {
                completion.fire();
            }
        }
    }

    fn hook(log: Log, event: &'static str, key: &'static str) -> impl Fn(&Renderable) + 'static {
        move |_| log.borrow_mut().push(format!("{event} {key}"))
    }

    fn row(log: &Log, key: &'static str) -> Item {
        let mk = log.clone();
        let template = RenderItem::new(move || {
            mk.borrow_mut().push(format!("make {key}"));
            Renderable::view(RecordingView {
                name: key,
                frame: Cell::new(Rect::ZERO),
                log: mk.clone(),
            })
        })
        .with_will_insert(hook(log.clone(), "will_insert", key))
        .with_did_insert(hook(log.clone(), "did_insert", key))
        .with_will_update(hook(log.clone(), "will_update", key))
        .with_update(hook(log.clone(), "update", key))
        .with_will_remove(hook(log.clone(), "will_remove", key))
        .with_did_remove(hook(log.clone(), "did_remove", key))
        .with_insert_transition(Transition::slide(-100.0, 0.0))
        .with_remove_transition(Transition::collapse())
        .with_timing(AnimationTiming::fast());
        Item::fixed(Size::new(100.0, 20.0), template)
    }

    struct Fixture {
        host: RenderHost,
        log: Log,
        keys: Rc<RefCell<Vec<&'static str>>>,
        builds: Rc<Cell<usize>>,
        ticks: Rc<TickFlag>,
    }

    impl Fixture {
        fn set_keys(&self, keys: &[&'static str]) {
            *self.keys.borrow_mut() = keys.to_vec();
        }

        fn take_log(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.borrow_mut())
        }

        fn frame_of(&self, key: &str) -> Rect {
            self.host
                .reconciler()
                .renderable(&NodeId::new(key))
                .map(|r| r.frame())
                .unwrap_or_else(|| panic!("{key} is not mounted"))
        }
    }

    fn fixture(keys: &[&'static str], animator: Rc<dyn Animator>, config: HostConfig) -> Fixture {
        let _ = env_logger::builder().is_test(true).try_init();

        let log = Log::default();
        let keys = Rc::new(RefCell::new(keys.to_vec()));
        let builds = Rc::new(Cell::new(0));
        let ticks = TickFlag::new();

        let (l, k, b) = (log.clone(), keys.clone(), builds.clone());
        let host = RenderHost::new(
            Renderable::view(Container),
            move |_ctx: &RenderContext| {
                b.set(b.get() + 1);
                let mut stack = VStack(0.0);
                for &key in k.borrow().iter() {
                    stack = stack.keyed_child(key, row(&l, key));
                }
                stack.boxed()
            },
            animator,
            ticks.clone(),
            config,
        );

        Fixture {
            host,
            log,
            keys,
            builds,
            ticks,
        }
    }

    fn manual() -> Rc<ManualAnimator> {
        Rc::new(ManualAnimator::default())
    }

    fn position(log: &[String], line: &str) -> usize {
        log.iter()
            .position(|l| l == line)
            .unwrap_or_else(|| panic!("{line:?} missing from {log:?}"))
    }

    #[test]
    fn test_insert_runs_hooks_in_order() {
        let f = fixture(&["a"], manual(), HostConfig::default());
        let report = f.host.refresh(false).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(
            f.take_log(),
            vec![
                "make a",
                "will_insert a",
                "will_update a",
                "attach a",
                "update a",
                "did_insert a"
            ]
        );
    }

    #[test]
    fn test_second_pass_reuses_everything() {
        let f = fixture(&["a", "b"], manual(), HostConfig::default());
        f.host.refresh(false);
        let first = f.host.reconciler().renderable(&NodeId::new("a")).unwrap();
        f.take_log();

        let report = f.host.refresh(false).unwrap();
        assert_eq!(report.reused, 2);
        assert_eq!(report.inserted + report.removed + report.removing, 0);
        assert_eq!(
            f.take_log(),
            vec!["will_update a", "update a", "will_update b", "update b"]
        );
        let again = f.host.reconciler().renderable(&NodeId::new("a")).unwrap();
        assert!(first.ptr_eq(&again));
    }

    #[test]
    fn test_unanimated_removal_detaches_immediately() {
        let f = fixture(&["a", "b"], manual(), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["b"]);
        f.take_log();

        let report = f.host.refresh(false).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(report.pending_removals, 0);
        let log = f.take_log();
        assert_eq!(&log[..3], ["will_remove a", "detach a", "did_remove a"]);
        assert!(!f.host.reconciler().is_mounted(&NodeId::new("a")));
    }

    #[test]
    fn test_animated_removal_waits_for_completion() {
        let anim = manual();
        let f = fixture(&["a", "b"], anim.clone(), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["a"]);
        f.take_log();

        let report = f.host.refresh(true).unwrap();
        assert_eq!(report.removing, 1);
        assert_eq!(report.pending_removals, 1);
        assert!(f.host.reconciler().is_removing(&NodeId::new("b")));
        let log = f.take_log();
        assert!(log.contains(&"will_remove b".to_string()));
        assert!(!log.contains(&"did_remove b".to_string()));

        anim.complete_all();
        assert_eq!(f.take_log(), vec!["detach b", "did_remove b"]);
        assert_eq!(f.host.reconciler().removing_len(), 0);
    }

    #[test]
    fn test_resurrection_keeps_instance_and_skips_did_remove() {
        let anim = manual();
        let f = fixture(&["a", "b"], anim.clone(), HostConfig::default());
        f.host.refresh(false);
        let original = f.host.reconciler().renderable(&NodeId::new("a")).unwrap();

        f.set_keys(&["b"]);
        f.host.refresh(true);
        assert!(f.host.reconciler().is_removing(&NodeId::new("a")));

        f.set_keys(&["a", "b"]);
        let report = f.host.refresh(false).unwrap();
        assert_eq!(report.resurrected, 1);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.pending_removals, 0);

        let back = f.host.reconciler().renderable(&NodeId::new("a")).unwrap();
        assert!(original.ptr_eq(&back));

        // the cancelled removal completion must not detach it
        anim.complete_all();
        let log = f.take_log();
        assert!(!log.contains(&"did_remove a".to_string()));
        assert!(!log.contains(&"detach a".to_string()));
        assert!(f.host.reconciler().is_mounted(&NodeId::new("a")));
        assert_eq!(f.frame_of("a"), Rect::new(0.0, 30.0, 100.0, 20.0));
    }

    #[test]
    fn test_removals_classified_before_inserts() {
        let f = fixture(&["a", "b"], manual(), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["c", "b"]);
        f.take_log();

        f.host.refresh(false);
        let log = f.take_log();
        assert!(position(&log, "did_remove a") < position(&log, "make c"));
        assert!(position(&log, "will_remove a") < position(&log, "will_update b"));
        assert_eq!(
            f.host.reconciler().order(),
            vec![NodeId::new("c"), NodeId::new("b")]
        );
    }

    #[test]
    fn test_small_content_is_centered() {
        let f = fixture(&["a", "b", "c"], manual(), HostConfig::default());
        f.host.refresh(false);
        assert_eq!(f.host.content_size(), Size::new(100.0, 60.0));
        assert_eq!(f.frame_of("a"), Rect::new(0.0, 20.0, 100.0, 20.0));
        assert_eq!(f.frame_of("c"), Rect::new(0.0, 60.0, 100.0, 20.0));

        f.host.set_bounds(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(f.builds.get(), 1);
        assert_eq!(f.frame_of("a"), Rect::new(50.0, 20.0, 100.0, 20.0));
    }

    const ROWS: [&str; 10] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9"];

    #[test]
    fn test_scrolling_culls_to_visible_rect() {
        let f = fixture(&ROWS, manual(), HostConfig::default());
        f.host.set_bounds(Rect::new(0.0, 0.0, 100.0, 50.0));
        f.host.refresh(false);
        assert_eq!(f.host.content_size(), Size::new(100.0, 200.0));
        assert_eq!(
            f.host.reconciler().order(),
            vec![NodeId::new("r0"), NodeId::new("r1"), NodeId::new("r2")]
        );

        f.host.set_content_offset(Vec2::new(0.0, 100.0));
        let mounted = f.host.reconciler();
        assert!(!mounted.is_mounted(&NodeId::new("r0")));
        assert!(mounted.is_mounted(&NodeId::new("r5")));
        assert_eq!(mounted.mounted_len(), 4);
        assert_eq!(f.frame_of("r5"), Rect::new(0.0, 100.0, 100.0, 20.0));

        f.host.set_visible_bounds_insets(EdgeInsets::symmetric(0.0, -30.0));
        assert!(mounted.is_mounted(&NodeId::new("r3")));
        assert!(mounted.is_mounted(&NodeId::new("r9")));
        assert_eq!(f.builds.get(), 1);
    }

    #[test]
    fn test_set_needs_refresh_coalesces() {
        let f = fixture(&["a"], manual(), HostConfig::default());
        f.host.set_needs_refresh(false);
        f.host.set_needs_refresh(true);
        f.host.set_needs_refresh(false);
        assert_eq!(f.builds.get(), 0);
        assert!(f.ticks.take());
        assert!(!f.ticks.is_set());

        let report = f.host.tick().unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(f.builds.get(), 1);
        assert!(f.host.tick().is_none());
        assert_eq!(f.builds.get(), 1);
    }

    #[test]
    fn test_refresh_during_pass_is_deferred() {
        let builds = Rc::new(Cell::new(0));
        let ticks = TickFlag::new();
        let b = builds.clone();
        let host = RenderHost::new(
            Renderable::view(Container),
            move |ctx: &RenderContext| {
                b.set(b.get() + 1);
                if b.get() == 1 {
                    let host = ctx.host().upgrade().unwrap();
                    assert!(host.is_in_pass());
                    assert!(host.refresh(true).is_none());
                }
                VStack(0.0).boxed()
            },
            Rc::new(ImmediateAnimator),
            ticks.clone(),
            HostConfig::default(),
        );

        assert!(host.refresh(false).is_some());
        assert_eq!(builds.get(), 1);
        assert!(!host.is_in_pass());
        assert!(host.has_pending_refresh());
        assert!(ticks.take());

        host.tick();
        assert_eq!(builds.get(), 2);
        assert!(!host.has_pending_refresh());
    }

    #[test]
    fn test_hook_requests_are_deferred() {
        let ticks = TickFlag::new();
        let weak: Rc<RefCell<WeakHost>> = Rc::default();
        let w = weak.clone();
        let host = RenderHost::new(
            Renderable::view(Container),
            move |_ctx: &RenderContext| {
                let w = w.clone();
                Item::fixed(
                    Size::new(10.0, 10.0),
                    RenderItem::new(|| Renderable::view(Container))
                        .with_did_insert(move |_| w.borrow().set_needs_refresh(false)),
                )
                .boxed()
            },
            Rc::new(ImmediateAnimator),
            ticks.clone(),
            HostConfig::default(),
        );
        *weak.borrow_mut() = host.downgrade();

        host.refresh(false);
        assert!(host.has_pending_refresh());
        assert!(ticks.take());
        assert_eq!(host.tick().unwrap().reused, 1);
    }

    #[test]
    #[should_panic(expected = "duplicate render item id")]
    fn test_duplicate_ids_fail_fast() {
        let host = RenderHost::new(
            Renderable::view(Container),
            |_ctx: &RenderContext| {
                let leaf = || {
                    Item::fixed(
                        Size::new(10.0, 10.0),
                        RenderItem::new(|| Renderable::view(Container)),
                    )
                    .fixed_id("dup")
                };
                HStack(0.0).child(leaf()).child(leaf()).boxed()
            },
            Rc::new(ImmediateAnimator),
            TickFlag::new(),
            HostConfig::default(),
        );
        host.refresh(false);
    }

    #[test]
    fn test_immediate_animator_finishes_removal_in_pass() {
        let f = fixture(&["a", "b"], Rc::new(ImmediateAnimator), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["b"]);
        f.take_log();

        let report = f.host.refresh(true).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(report.removing, 0);
        assert_eq!(report.pending_removals, 0);
        let log = f.take_log();
        assert!(position(&log, "will_remove a") < position(&log, "did_remove a"));
    }

    #[test]
    fn test_policy_never_skips_transitions() {
        let anim = manual();
        let config = HostConfig::default().animation_policy(AnimationPolicy::Never);
        let f = fixture(&["a", "b"], anim.clone(), config);
        f.host.refresh(false);
        f.set_keys(&["b"]);

        let report = f.host.refresh(true).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(anim.len(), 0);
    }

    #[test]
    fn test_animated_insert_starts_offstage() {
        let anim = manual();
        let f = fixture(&["a", "b"], anim.clone(), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["a", "b", "c"]);
        f.take_log();

        f.host.refresh(true);
        assert_eq!(f.frame_of("c"), Rect::new(-100.0, 60.0, 100.0, 20.0));
        assert!(!f.take_log().contains(&"did_insert c".to_string()));

        anim.complete_all();
        assert_eq!(f.frame_of("c"), Rect::new(0.0, 60.0, 100.0, 20.0));
        assert_eq!(f.frame_of("a"), Rect::new(0.0, 20.0, 100.0, 20.0));
        assert_eq!(f.take_log(), vec!["did_insert c"]);
    }

    #[test]
    fn test_unmount_detaches_everything() {
        let anim = manual();
        let f = fixture(&["a", "b"], anim.clone(), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["a"]);
        f.host.refresh(true);
        f.take_log();

        f.host.unmount();
        let log = f.take_log();
        assert!(log.contains(&"did_remove b".to_string()));
        assert!(log.contains(&"did_remove a".to_string()));
        assert_eq!(f.host.reconciler().mounted_len(), 0);

        anim.complete_all();
        assert!(f.take_log().is_empty());
    }

    #[test]
    fn test_inspector_counts_passes() {
        let f = fixture(&["a"], manual(), HostConfig::default().inspector(true));
        f.host.refresh(false);
        f.host.refresh(false);
        let summary = f.host.inspector_summary().unwrap();
        assert!(summary.starts_with("passes: 2"), "{summary}");

        let plain = fixture(&["a"], manual(), HostConfig::default());
        assert!(plain.host.inspector_summary().is_none());
    }

    #[test]
    fn test_tick_animator_interpolates_and_completes() {
        let log = Log::default();
        let view = Renderable::view(RecordingView {
            name: "v",
            frame: Cell::new(Rect::ZERO),
            log: log.clone(),
        });
        let animator = TickAnimator::new();
        let done = Rc::new(Cell::new(0));
        let d = done.clone();
        animator.animate(
            &view,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(100.0, 0.0, 10.0, 10.0),
            &AnimationTiming::tween(Duration::from_millis(100), Easing::Linear),
            Completion::new(move || d.set(d.get() + 1)),
        );

        animator.advance(Duration::from_millis(50));
        assert!((view.frame().x - 50.0).abs() < 0.01);
        assert_eq!(done.get(), 0);

        animator.advance(Duration::from_millis(60));
        assert_eq!(view.frame(), Rect::new(100.0, 0.0, 10.0, 10.0));
        assert_eq!(done.get(), 1);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_tick_animator_replaces_running_track() {
        let view = Renderable::view(Container);
        let animator = TickAnimator::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let timing = AnimationTiming::default();

        let f1 = fired.clone();
        animator.animate(
            &view,
            Rect::ZERO,
            Rect::new(1.0, 1.0, 1.0, 1.0),
            &timing,
            Completion::new(move || f1.borrow_mut().push("first")),
        );
        let f2 = fired.clone();
        animator.animate(
            &view,
            Rect::ZERO,
            Rect::new(2.0, 2.0, 1.0, 1.0),
            &timing,
            Completion::new(move || f2.borrow_mut().push("second")),
        );
        assert_eq!(*fired.borrow(), vec!["first"]);
        assert_eq!(animator.active(), 1);

        animator.finish_all();
        assert_eq!(*fired.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_centering_offset() {
        assert_eq!(
            centering_offset(Size::new(100.0, 100.0), Size::new(40.0, 120.0)),
            Vec2::new(30.0, 0.0)
        );
    }

    #[test]
    fn test_snap_replaces_running_insert_animation() {
        let anim = Rc::new(TickAnimator::new());
        let f = fixture(&["a"], anim.clone(), HostConfig::default());
        f.host.refresh(true);
        assert_eq!(f.frame_of("a"), Rect::new(-100.0, 40.0, 100.0, 20.0));
        assert_eq!(anim.active(), 1);

        f.set_keys(&["b", "a"]);
        f.host.refresh(false);
        assert_eq!(f.frame_of("a"), Rect::new(0.0, 50.0, 100.0, 20.0));
        assert!(anim.is_idle());

        anim.advance(Duration::from_secs(2));
        assert_eq!(f.frame_of("a"), Rect::new(0.0, 50.0, 100.0, 20.0));
        let log = f.take_log();
        assert_eq!(log.iter().filter(|l| *l == "did_insert a").count(), 1);
    }

    #[test]
    fn test_animated_reuse_retargets_from_current_frame() {
        let anim = Rc::new(TickAnimator::new());
        let f = fixture(&["a"], anim.clone(), HostConfig::default());
        f.host.refresh(true);
        anim.advance(Duration::from_millis(150));

        f.set_keys(&["b", "a"]);
        f.host.refresh(true);
        assert_eq!(anim.active(), 2);
        anim.advance(Duration::from_secs(2));
        assert_eq!(f.frame_of("a"), Rect::new(0.0, 50.0, 100.0, 20.0));
        assert_eq!(f.frame_of("b"), Rect::new(0.0, 30.0, 100.0, 20.0));
    }

    #[test]
    fn test_removed_before_insert_finished_skips_did_insert() {
        let anim = manual();
        let f = fixture(&["a"], anim.clone(), HostConfig::default());
        f.host.refresh(false);
        f.set_keys(&["a", "b"]);
        f.take_log();

        f.host.refresh(true);
        assert!(!f.take_log().contains(&"did_insert b".to_string()));

        f.set_keys(&["a"]);
        f.host.refresh(false);
        anim.complete_all();
        let log = f.take_log();
        assert!(position(&log, "will_remove b") < position(&log, "did_remove b"));
        assert!(!log.contains(&"did_insert b".to_string()), "{log:?}");
    }

    #[test]
    fn test_unmount_cancels_pending_insert() {
        let anim = manual();
        let f = fixture(&["a"], anim.clone(), HostConfig::default());
        f.host.refresh(true);
        f.host.unmount();
        anim.complete_all();

        let log = f.take_log();
        assert!(log.contains(&"did_remove a".to_string()));
        assert!(!log.contains(&"did_insert a".to_string()), "{log:?}");
    }

    #[test]
    fn test_pinned_item_moves_between_parents_in_one_pass() {
        let log = Log::default();
        let moved = Rc::new(Cell::new(false));
        let (l, m) = (log.clone(), moved.clone());
        let host = RenderHost::new(
            Renderable::view(Container),
            move |_ctx: &RenderContext| {
                let pinned = row(&l, "p").fixed_id("p");
                let (left, right) = if m.get() {
                    (
                        VStack(0.0),
                        VStack(0.0).keyed_child("y", row(&l, "y")).child(pinned),
                    )
                } else {
                    (
                        VStack(0.0).child(pinned).keyed_child("x", row(&l, "x")),
                        VStack(0.0),
                    )
                };
                VStack(0.0)
                    .keyed_child("left", left)
                    .keyed_child("right", right)
                    .boxed()
            },
            manual(),
            TickFlag::new(),
            HostConfig::default(),
        );

        host.refresh(false);
        let pin = NodeId::fixed("p");
        let original = host.reconciler().renderable(&pin).unwrap();
        assert_eq!(original.frame(), Rect::new(0.0, 30.0, 100.0, 20.0));
        log.borrow_mut().clear();

        moved.set(true);
        let report = host.refresh(false).unwrap();
        assert_eq!((report.inserted, report.reused, report.removed), (1, 1, 1));
        assert_eq!(
            *log.borrow(),
            vec![
                "will_remove x",
                "detach x",
                "did_remove x",
                "make y",
                "will_insert y",
                "will_update y",
                "attach y",
                "update y",
                "did_insert y",
                "will_update p",
                "update p",
            ]
        );
        let after = host.reconciler().renderable(&pin).unwrap();
        assert!(original.ptr_eq(&after));
        assert_eq!(after.frame(), Rect::new(0.0, 50.0, 100.0, 20.0));
    }

    #[test]
    fn test_hooks_can_query_the_reconciler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let host = RenderHost::new(
            Renderable::view(Container),
            move |ctx: &RenderContext| {
                let (weak, s) = (ctx.host().clone(), s.clone());
                Item::fixed(
                    Size::new(10.0, 10.0),
                    RenderItem::new(|| Renderable::view(Container)).with_update(move |_| {
                        let host = weak.upgrade().unwrap();
                        let r = host.reconciler();
                        s.borrow_mut().push((
                            r.mounted_len(),
                            r.is_mounted(&NodeId::root()),
                            r.renderable(&NodeId::root()).is_some(),
                        ));
                    }),
                )
                .boxed()
            },
            Rc::new(ImmediateAnimator),
            TickFlag::new(),
            HostConfig::default(),
        );

        host.refresh(false);
        host.refresh(false);
        assert_eq!(*seen.borrow(), vec![(0, false, false), (1, true, true)]);
    }

    #[test]
    fn test_unmount_from_a_hook_waits_for_the_pass() {
        let log = Log::default();
        let keys = Rc::new(RefCell::new(vec!["a", "b"]));
        let (l, k) = (log.clone(), keys.clone());
        let host = RenderHost::new(
            Renderable::view(Container),
            move |ctx: &RenderContext| {
                let mut stack = VStack(0.0);
                for &key in k.borrow().iter() {
                    let weak = ctx.host().clone();
                    let item = row(&l, key).map(|t| {
                        t.with_will_remove(move |_| {
                            if let Some(host) = weak.upgrade() {
                                host.unmount();
                            }
                        })
                    });
                    stack = stack.keyed_child(key, item);
                }
                stack.boxed()
            },
            manual(),
            TickFlag::new(),
            HostConfig::default(),
        );

        host.refresh(false);
        keys.borrow_mut().retain(|key| *key != "a");
        log.borrow_mut().clear();

        let report = host.refresh(false).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(host.reconciler().mounted_len(), 0);
        let lines = log.borrow();
        assert!(position(&lines, "did_remove a") < position(&lines, "update b"));
        assert!(position(&lines, "update b") < position(&lines, "did_remove b"));
    }
}
