//! Volume fades advanced once per tick.
//!
//! A fade is plain data: start level, target level, duration and elapsed
//! time. The scheduler keeps an update list of them and steps every entry
//! when the player ticks. Cancelling is removal from the list, so a
//! cancelled fade never pushes another value; whatever it pushed last stays
//! until something else overrides it.
//!
//! Levels handled here are *unscaled*. The player multiplies by the global
//! volume scale when it stores and pushes each step.

use wavy_core::SongId;

/// Handle to a scheduled fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FadeId(u64);

/// Invoked once with `(song, layer)` when a fade reaches its target.
pub type FadeCallback = Box<dyn FnOnce(SongId, usize)>;

/// What happens when a fade reaches its target.
pub(crate) enum FadeCompletion {
    None,
    Callback(FadeCallback),
    /// The master-layer fade of a stop sequence; tears the song down.
    FinishStop,
}

impl FadeCompletion {
    pub(crate) fn from_callback(callback: Option<FadeCallback>) -> Self {
        callback.map_or(FadeCompletion::None, FadeCompletion::Callback)
    }
}

impl std::fmt::Debug for FadeCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FadeCompletion::None => write!(f, "None"),
            FadeCompletion::Callback(_) => write!(f, "Callback"),
            FadeCompletion::FinishStop => write!(f, "FinishStop"),
        }
    }
}

/// Linear interpolation of one layer's level toward a target.
#[derive(Debug)]
pub(crate) struct FadeTask {
    id: FadeId,
    song: SongId,
    layer: usize,
    start: f32,
    target: f32,
    duration: f64,
    elapsed: f64,
    completion: FadeCompletion,
}

impl FadeTask {
    /// Level after `elapsed` seconds.
    fn level(&self) -> f32 {
        if self.elapsed >= self.duration {
            return self.target;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0) as f32;
        self.start + (self.target - self.start) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One fade's output for a tick.
#[derive(Debug)]
pub(crate) struct FadeStep {
    pub id: FadeId,
    pub song: SongId,
    pub layer: usize,
    pub level: f32,
    /// `Some` when the fade finished on this tick.
    pub completion: Option<FadeCompletion>,
}

/// Update list of running fades.
#[derive(Debug, Default)]
pub(crate) struct FadeScheduler {
    tasks: Vec<FadeTask>,
    next_id: u64,
}

impl FadeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fade. `duration` must be positive; instant sets never
    /// reach the scheduler.
    pub fn start(
        &mut self,
        song: SongId,
        layer: usize,
        start: f32,
        target: f32,
        duration: f64,
        completion: FadeCompletion,
    ) -> FadeId {
        debug_assert!(duration > 0.0);

        let id = FadeId(self.next_id);
        self.next_id += 1;
        self.tasks.push(FadeTask {
            id,
            song,
            layer,
            start,
            target,
            duration,
            elapsed: 0.0,
            completion,
        });
        id
    }

    /// Remove a fade without running its completion. Returns false if it
    /// had already finished or been cancelled.
    pub fn cancel(&mut self, id: FadeId) -> bool {
        match self.tasks.iter().position(|task| task.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every fade belonging to a song.
    pub fn cancel_song(&mut self, song: SongId) {
        self.tasks.retain(|task| task.song != song);
    }

    #[cfg(test)]
    pub fn is_running(&self, id: FadeId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Advance every fade by `dt` seconds, appending one step per fade to
    /// `steps`. Finished fades are removed and hand over their completion.
    pub fn advance(&mut self, dt: f64, steps: &mut Vec<FadeStep>) {
        let dt = dt.max(0.0);

        for task in &mut self.tasks {
            task.elapsed += dt;
        }

        let mut index = 0;
        while index < self.tasks.len() {
            let task = &self.tasks[index];
            if task.is_done() {
                let task = self.tasks.remove(index);
                steps.push(FadeStep {
                    id: task.id,
                    song: task.song,
                    layer: task.layer,
                    level: task.target,
                    completion: Some(task.completion),
                });
            } else {
                steps.push(FadeStep {
                    id: task.id,
                    song: task.song,
                    layer: task.layer,
                    level: task.level(),
                    completion: None,
                });
                index += 1;
            }
        }
    }
}
