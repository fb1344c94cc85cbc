use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::{Completion, Rect, Renderable, Vec2};

/// Progress curve over normalized time. Every curve maps 0 to 0 and 1 to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Damped spring with unit mass. Normalized time spans
    /// [`Easing::settle_time`], after which the spring is within a fraction of
    /// a percent of its target.
    Spring { stiffness: f32, damping: f32 },
}

/// Envelope decay, in time constants, a spring gets before it counts as settled.
const SPRING_SETTLE: f32 = 6.0;

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut if t < 0.5 => 2.0 * t * t,
            Easing::EaseInOut => 1.0 - 2.0 * (1.0 - t) * (1.0 - t),
            Easing::Spring { .. } if t >= 1.0 => 1.0,
            Easing::Spring { stiffness, damping } => {
                spring_position(stiffness, damping, t * Self::spring_settle(stiffness, damping))
            }
        }
    }

    /// Seconds a spring needs to settle; `None` for the fixed curves.
    pub fn settle_time(&self) -> Option<f32> {
        match *self {
            Easing::Spring { stiffness, damping } => Some(Self::spring_settle(stiffness, damping)),
            _ => None,
        }
    }

    fn spring_settle(stiffness: f32, damping: f32) -> f32 {
        let omega = stiffness.max(f32::EPSILON).sqrt();
        let zeta = damping.max(0.0) / (2.0 * omega);
        // slowest decay rate of the homogeneous solution
        let decay = if zeta < 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        SPRING_SETTLE / decay.max(f32::EPSILON)
    }
}

/// Position at `time` seconds of a unit-mass spring released at 0 towards 1.
fn spring_position(stiffness: f32, damping: f32, time: f32) -> f32 {
    let omega = stiffness.max(f32::EPSILON).sqrt();
    let zeta = damping.max(0.0) / (2.0 * omega);
    if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * time).exp();
        1.0 - envelope * ((omega_d * time).cos() + zeta * omega / omega_d * (omega_d * time).sin())
    } else if zeta == 1.0 {
        1.0 - (-omega * time).exp() * (1.0 + omega * time)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        1.0 - (r2 * (r1 * time).exp() - r1 * (r2 * time).exp()) / (r2 - r1)
    }
}

/// How an animator should move a renderable between two frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTiming {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationTiming {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// Near-critically damped spring that settles in about 0.46 s.
    pub fn spring() -> Self {
        Self::spring_with(170.0, 26.0)
    }

    /// Spring timing whose duration is the spring's settle time.
    pub fn spring_with(stiffness: f32, damping: f32) -> Self {
        let easing = Easing::Spring { stiffness, damping };
        let settle = easing.settle_time().unwrap_or_default();
        Self {
            duration: Duration::from_secs_f32(settle),
            easing,
            delay: Duration::ZERO,
        }
    }

    pub fn fast() -> Self {
        Self {
            duration: Duration::from_millis(150),
            easing: Easing::EaseOut,
            delay: Duration::ZERO,
        }
    }

    pub fn slow() -> Self {
        Self {
            duration: Duration::from_millis(600),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Rect {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
            w: self.w.interpolate(&other.w, t),
            h: self.h.interpolate(&other.h, t),
        }
    }
}

/// Where an element sits when it is "off stage": the frame an insert starts
/// from and a removal ends at.
#[derive(Clone)]
pub enum TransitionEffect {
    Slide(Vec2),
    /// Scales about the frame's center.
    Scale(f32),
    /// Zero height at the same origin.
    Collapse,
    Custom(Rc<dyn Fn(Rect) -> Rect>),
}

impl TransitionEffect {
    pub fn offstage(&self, frame: Rect) -> Rect {
        match self {
            TransitionEffect::Slide(by) => frame.translate(*by),
            TransitionEffect::Scale(f) => frame.scale_about_center(*f),
            TransitionEffect::Collapse => Rect { h: 0.0, ..frame },
            TransitionEffect::Custom(f) => f(frame),
        }
    }
}

impl fmt::Debug for TransitionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionEffect::Slide(by) => f.debug_tuple("Slide").field(by).finish(),
            TransitionEffect::Scale(s) => f.debug_tuple("Scale").field(s).finish(),
            TransitionEffect::Collapse => write!(f, "Collapse"),
            TransitionEffect::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Transition {
    pub effect: TransitionEffect,
    pub timing: AnimationTiming,
}

impl Transition {
    pub fn new(effect: TransitionEffect) -> Self {
        Self {
            effect,
            timing: AnimationTiming::default(),
        }
    }

    pub fn slide(dx: f32, dy: f32) -> Self {
        Self::new(TransitionEffect::Slide(Vec2::new(dx, dy)))
    }

    pub fn scale(factor: f32) -> Self {
        Self::new(TransitionEffect::Scale(factor))
    }

    pub fn collapse() -> Self {
        Self::new(TransitionEffect::Collapse)
    }

    pub fn custom(f: impl Fn(Rect) -> Rect + 'static) -> Self {
        Self::new(TransitionEffect::Custom(Rc::new(f)))
    }

    pub fn with_timing(mut self, timing: AnimationTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn offstage(&self, frame: Rect) -> Rect {
        self.effect.offstage(frame)
    }
}

/// Schedules frame animations on renderables.
///
/// `animate` must return without blocking. The completion has to be fired
/// exactly once, on this or a later run-loop turn; firing a cancelled
/// completion is allowed and does nothing.
pub trait Animator {
    fn animate(
        &self,
        renderable: &Renderable,
        from: Rect,
        to: Rect,
        timing: &AnimationTiming,
        completion: Completion,
    );

    /// Stops any animation running on `renderable`, firing its completion.
    ///
    /// Once this returns the animator writes no further frames to
    /// `renderable` until the next `animate` call on it. The reconciler calls
    /// it before every frame change it makes.
    fn cancel(&self, _renderable: &Renderable) {}
}

/// Jumps straight to the target frame and completes synchronously.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateAnimator;

impl Animator for ImmediateAnimator {
    fn animate(
        &self,
        renderable: &Renderable,
        _from: Rect,
        to: Rect,
        _timing: &AnimationTiming,
        completion: Completion,
    ) {
        renderable.snap_frame(to);
        completion.fire();
    }
}
