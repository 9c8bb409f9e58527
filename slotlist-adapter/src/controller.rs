use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slotlist::{
    ListEngine, ListOptions, Point, Result, ScrollEvent, ScrollRequest, ScrollToEndParams,
    ScrollToIndexParams, Size,
};

use crate::{Easing, Tween};

/// Duration of animated scrolls unless configured otherwise.
pub const DEFAULT_SCROLL_DURATION_MS: u64 = 300;

/// A scroll primitive the engine asked the host scroll view to perform.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostOp {
    ScrollTo(ScrollRequest),
    /// Relative correction (scroll-by).
    Adjust(f64),
}

type OpQueue = Arc<Mutex<Vec<HostOp>>>;

fn lock(queue: &OpQueue) -> MutexGuard<'_, Vec<HostOp>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

fn oriented(horizontal: bool, main: f64, cross: f64) -> Size {
    if horizontal {
        Size::new(main, cross)
    } else {
        Size::new(cross, main)
    }
}

/// A framework-neutral controller that owns a `slotlist::ListEngine` and plays the native
/// scroll view around it.
///
/// The controller installs the engine's scroll handlers, applies the requested offsets to its
/// own simulated scroll position, and reports them back as scroll events on the next
/// [`Controller::tick`], the way a real scroll view echoes programmatic scrolls
/// asynchronously. Animated scrolls are tweened.
///
/// Adapters drive it by calling:
/// - `on_layout` / `on_user_scroll` / `on_item_layout` when UI events occur
/// - `tick(now_ms)` every frame (echoes, tweens, engine deadlines and animation frames)
pub struct Controller<T> {
    engine: ListEngine<T>,
    ops: OpQueue,
    executed: Vec<HostOp>,
    offset: f64,
    viewport: Size,
    echoes: VecDeque<f64>,
    tween: Option<Tween>,
    easing: Easing,
    duration_ms: u64,
}

impl<T> Controller<T> {
    /// Creates the engine with this controller's scroll handlers.
    ///
    /// Handlers already set on `options` are replaced.
    pub fn new(options: ListOptions<T>, data: Vec<T>, now_ms: u64) -> Result<Self> {
        let ops = OpQueue::default();
        let scroll_ops = Arc::clone(&ops);
        let adjust_ops = Arc::clone(&ops);
        let options = options
            .with_scroll_to_handler(move |request| lock(&scroll_ops).push(HostOp::ScrollTo(request)))
            .with_scroll_adjust_handler(move |delta| lock(&adjust_ops).push(HostOp::Adjust(delta)));
        let engine = ListEngine::new(options, data, now_ms)?;
        let offset = engine.scroll();
        Ok(Self {
            engine,
            ops,
            executed: Vec::new(),
            offset,
            viewport: Size::default(),
            echoes: VecDeque::new(),
            tween: None,
            easing: Easing::default(),
            duration_ms: DEFAULT_SCROLL_DURATION_MS,
        })
    }

    pub fn with_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.duration_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn engine(&self) -> &ListEngine<T> {
        &self.engine
    }

    pub fn into_engine(self) -> ListEngine<T> {
        self.engine
    }

    /// Offset of the simulated scroll view.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Every scroll primitive executed so far, oldest first.
    pub fn executed_ops(&self) -> &[HostOp] {
        &self.executed
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// `true` when nothing is queued, animating or waiting on a deadline.
    pub fn is_idle(&self) -> bool {
        self.echoes.is_empty()
            && self.tween.is_none()
            && !self.engine.needs_animation_frame()
            && self.engine.next_deadline_ms().is_none()
    }

    pub fn on_layout(&mut self, viewport: Size, now_ms: u64) -> Result<()> {
        self.viewport = viewport;
        self.engine.on_layout(viewport, now_ms)?;
        self.drain(now_ms);
        Ok(())
    }

    /// The user moved the scroll view. Cancels a running tween.
    pub fn on_user_scroll(&mut self, offset: f64, now_ms: u64) -> Result<()> {
        let interrupted = self.tween.take().is_some();
        self.set_offset(offset);
        self.engine.on_scroll(self.event_at(self.offset), now_ms)?;
        if interrupted {
            self.engine.on_scroll_end(now_ms)?;
        }
        self.drain(now_ms);
        Ok(())
    }

    pub fn on_item_layout(&mut self, key: &str, main: f64, now_ms: u64) -> Result<()> {
        let size = oriented(
            self.engine.options().horizontal,
            main,
            self.viewport.cross(self.engine.options().horizontal),
        );
        self.engine.on_item_layout(key, size, now_ms)?;
        self.drain(now_ms);
        Ok(())
    }

    /// Reports a layout for every rendered container, sized by `size_of`.
    pub fn layout_containers(
        &mut self,
        now_ms: u64,
        size_of: impl Fn(&T, usize) -> f64,
    ) -> Result<()> {
        let rendered: Vec<(slotlist::ItemKey, usize)> = self
            .engine
            .containers()
            .iter()
            .filter_map(|c| Some((c.item_key.clone()?, c.index?)))
            .collect();
        for (key, index) in rendered {
            let Some(item) = self.engine.data().get(index) else {
                continue;
            };
            let main = size_of(item, index);
            self.on_item_layout(&key, main, now_ms)?;
        }
        Ok(())
    }

    pub fn set_data(&mut self, data: Vec<T>, now_ms: u64) -> Result<()> {
        self.engine.tick(now_ms)?;
        self.engine.set_data(data)?;
        self.drain(now_ms);
        Ok(())
    }

    pub fn scroll_to_index(&mut self, params: ScrollToIndexParams, now_ms: u64) -> Result<()> {
        self.engine.tick(now_ms)?;
        self.engine.scroll_to_index(params)?;
        self.drain(now_ms);
        Ok(())
    }

    pub fn scroll_to_end(&mut self, params: ScrollToEndParams, now_ms: u64) -> Result<()> {
        self.engine.tick(now_ms)?;
        self.engine.scroll_to_end(params)?;
        self.drain(now_ms);
        Ok(())
    }

    /// Runs any other engine operation and executes the scrolls it requested.
    pub fn update<R>(
        &mut self,
        now_ms: u64,
        f: impl FnOnce(&mut ListEngine<T>) -> Result<R>,
    ) -> Result<R> {
        self.engine.tick(now_ms)?;
        let out = f(&mut self.engine)?;
        self.drain(now_ms);
        Ok(out)
    }

    /// Advances the host loop by one frame.
    ///
    /// Delivers pending scroll echoes, steps the tween, then runs engine deadlines and the
    /// animation frame. Returns the tweened offset while an animation is running.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<f64>> {
        // Echoes queued while delivering these wait for the next frame.
        let echoes = std::mem::take(&mut self.echoes);
        for offset in echoes {
            atrace!(offset, "scroll echo");
            self.engine.on_scroll(self.event_at(offset), now_ms)?;
            self.drain(now_ms);
        }

        let mut animated = None;
        if let Some(tween) = self.tween {
            self.set_offset(tween.sample(now_ms));
            self.engine.on_scroll(self.event_at(self.offset), now_ms)?;
            animated = Some(self.offset);
            if tween.is_done(now_ms) {
                self.tween = None;
                adebug!(offset = self.offset, "animated scroll finished");
                self.engine.on_scroll_end(now_ms)?;
            }
            self.drain(now_ms);
        }

        self.engine.tick(now_ms)?;
        self.drain(now_ms);
        if self.engine.needs_animation_frame() {
            self.engine.on_animation_frame(now_ms)?;
            self.drain(now_ms);
        }
        Ok(animated)
    }

    /// Ticks every `step_ms` until idle or `max_steps` frames have run. Returns the last time.
    pub fn settle(&mut self, mut now_ms: u64, step_ms: u64, max_steps: usize) -> Result<u64> {
        for _ in 0..max_steps {
            if self.is_idle() {
                break;
            }
            now_ms += step_ms;
            self.tick(now_ms)?;
        }
        Ok(now_ms)
    }

    fn max_offset(&self) -> f64 {
        let length = self.viewport.main(self.engine.options().horizontal);
        (self.engine.content_size() - length).max(0.0)
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset());
    }

    fn event_at(&self, offset: f64) -> ScrollEvent {
        let horizontal = self.engine.options().horizontal;
        let content_offset = if horizontal {
            Point::new(offset, 0.0)
        } else {
            Point::new(0.0, offset)
        };
        ScrollEvent {
            content_offset,
            content_size: oriented(
                horizontal,
                self.engine.content_size(),
                self.viewport.cross(horizontal),
            ),
            layout_measurement: Some(self.viewport),
        }
    }

    fn drain(&mut self, now_ms: u64) {
        let ops = std::mem::take(&mut *lock(&self.ops));
        for op in ops {
            match op {
                HostOp::ScrollTo(request) if request.animated => {
                    adebug!(to = request.offset, "animated scroll started");
                    let tween = match self.tween {
                        Some(mut running) => {
                            running.retarget(now_ms, request.offset, self.duration_ms);
                            running
                        }
                        None => Tween::new(
                            self.offset,
                            request.offset,
                            now_ms,
                            self.duration_ms,
                            self.easing,
                        ),
                    };
                    self.tween = Some(tween);
                }
                HostOp::ScrollTo(request) => {
                    self.tween = None;
                    self.set_offset(request.offset);
                    self.echoes.push_back(self.offset);
                }
                HostOp::Adjust(delta) => {
                    if let Some(tween) = &mut self.tween {
                        tween.shift(delta);
                    }
                    self.set_offset(self.offset + delta);
                    self.echoes.push_back(self.offset);
                }
            }
            self.executed.push(op);
        }
    }
}

impl<T> core::fmt::Debug for Controller<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("engine", &self.engine)
            .field("offset", &self.offset)
            .field("viewport", &self.viewport)
            .field("echoes", &self.echoes)
            .field("tween", &self.tween)
            .finish_non_exhaustive()
    }
}
