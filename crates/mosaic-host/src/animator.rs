use std::cell::{Cell, RefCell};
use std::time::Duration;

use mosaic_core::{AnimationTiming, Animator, Completion, Interpolate, Rect, Renderable};

struct Track {
    renderable: Renderable,
    from: Rect,
    to: Rect,
    timing: AnimationTiming,
    started: Duration,
    completion: Completion,
}

impl Track {
    fn progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.started + self.timing.delay);
        if self.timing.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.timing.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Headless animator driven by explicit time.
///
/// Frames are written on [`TickAnimator::advance`]; completions fire once a
/// track reaches its target. Starting a new animation on a renderable that is
/// already animating replaces the old track and fires its completion.
#[derive(Default)]
pub struct TickAnimator {
    now: Cell<Duration>,
    tracks: RefCell<Vec<Track>>,
}

impl TickAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn active(&self) -> usize {
        self.tracks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.tracks.borrow().is_empty()
    }

    /// Moves the clock forward and applies interpolated frames.
    pub fn advance(&self, dt: Duration) {
        let now = self.now.get() + dt;
        self.now.set(now);

        let done: Vec<Track> = {
            let mut tracks = self.tracks.borrow_mut();
            for t in tracks.iter() {
                let p = t.timing.easing.interpolate(t.progress(now));
                t.renderable.snap_frame(t.from.interpolate(&t.to, p));
            }
            let (done, running): (Vec<Track>, Vec<Track>) =
                tracks.drain(..).partition(|t| t.progress(now) >= 1.0);
            *tracks = running;
            done
        };

        for t in done {
            t.renderable.snap_frame(t.to);
            t.completion.fire();
        }
    }

    /// Jumps every running track to its end.
    pub fn finish_all(&self) {
        let tracks = std::mem::take(&mut *self.tracks.borrow_mut());
        for t in tracks {
            t.renderable.snap_frame(t.to);
            t.completion.fire();
        }
    }

    fn take_track(&self, renderable: &Renderable) -> Option<Track> {
        let mut tracks = self.tracks.borrow_mut();
        let i = tracks.iter().position(|t| t.renderable.ptr_eq(renderable))?;
        Some(tracks.remove(i))
    }
}

impl Animator for TickAnimator {
    fn animate(
        &self,
        renderable: &Renderable,
        from: Rect,
        to: Rect,
        timing: &AnimationTiming,
        completion: Completion,
    ) {
        if let Some(old) = self.take_track(renderable) {
            old.completion.fire();
        }
        renderable.snap_frame(from);
        self.tracks.borrow_mut().push(Track {
            renderable: renderable.clone(),
            from,
            to,
            timing: *timing,
            started: self.now.get(),
            completion,
        });
    }

    fn cancel(&self, renderable: &Renderable) {
        if let Some(old) = self.take_track(renderable) {
            old.completion.fire();
        }
    }
}
