//! The scene bank and its daily selection policies.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use heartline_core::config::SelectionPolicy;
use heartline_core::error::GameError;
use heartline_core::rng::DeterministicRng;
use tracing::{debug, info, warn};

use crate::domain::scene::Scene;

/// Owns the registered scenes and the per-day selection state.
///
/// Scenes are immutable after registration and are handed out as shared
/// references. The day counter starts at 1.
pub struct SceneBank {
    scenes: Vec<Arc<Scene>>,
    index: HashMap<String, usize>,
    played_today: HashSet<String>,
    day: u32,
    active: Option<Arc<Scene>>,
    queue: VecDeque<Arc<Scene>>,
    queue_started: bool,
    rng: Box<dyn DeterministicRng>,
}

impl fmt::Debug for SceneBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneBank")
            .field("scenes", &self.scenes.len())
            .field("played_today", &self.played_today)
            .field("day", &self.day)
            .field("active", &self.active.as_ref().map(|scene| &scene.id))
            .field("queue", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl SceneBank {
    /// Creates an empty bank drawing randomness from `rng`.
    #[must_use]
    pub fn new(rng: Box<dyn DeterministicRng>) -> Self {
        Self {
            scenes: Vec::new(),
            index: HashMap::new(),
            played_today: HashSet::new(),
            day: 1,
            active: None,
            queue: VecDeque::new(),
            queue_started: false,
            rng,
        }
    }

    /// Creates a bank and registers every scene, logging content defects.
    ///
    /// # Errors
    ///
    /// Returns `GameError::DuplicateScene` if two scenes share an identifier.
    pub fn from_scenes<I>(scenes: I, rng: Box<dyn DeterministicRng>) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = Scene>,
    {
        let mut bank = Self::new(rng);
        for scene in scenes {
            for (question, defect) in scene.defects() {
                warn!(scene_id = %scene.id, question, %defect, "content defect");
            }
            bank.register(scene)?;
        }
        Ok(bank)
    }

    /// Adds a scene.
    ///
    /// # Errors
    ///
    /// Returns `GameError::DuplicateScene` if the identifier is already taken.
    pub fn register(&mut self, scene: Scene) -> Result<(), GameError> {
        if self.index.contains_key(&scene.id) {
            return Err(GameError::DuplicateScene(scene.id));
        }
        self.index.insert(scene.id.clone(), self.scenes.len());
        self.scenes.push(Arc::new(scene));
        Ok(())
    }

    /// Picks a scene uniformly at random among those not played today.
    ///
    /// When every scene has been played, the played-today set is cleared and
    /// the day counter incremented before picking from the full set.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyBank` if no scenes are registered.
    pub fn select_random_unplayed(&mut self) -> Result<Arc<Scene>, GameError> {
        if self.scenes.is_empty() {
            return Err(GameError::EmptyBank);
        }

        let mut candidates: Vec<usize> = (0..self.scenes.len())
            .filter(|&i| !self.played_today.contains(&self.scenes[i].id))
            .collect();
        if candidates.is_empty() {
            self.start_new_day();
            candidates = (0..self.scenes.len()).collect();
        }

        let pick = self.pick_index(candidates.len());
        let scene = Arc::clone(&self.scenes[candidates[pick]]);
        self.mark_played(&scene);
        debug!(scene_id = %scene.id, day = self.day, "selected random scene");
        Ok(scene)
    }

    /// Looks a scene up by identifier and makes it the active scene.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SceneNotFound` if no scene has this identifier.
    pub fn select_by_id(&mut self, id: &str) -> Result<Arc<Scene>, GameError> {
        let scene = self
            .get(id)
            .ok_or_else(|| GameError::SceneNotFound(id.to_owned()))?;
        self.active = Some(Arc::clone(&scene));
        Ok(scene)
    }

    /// Replaces the rotation queue with a fresh Fisher–Yates permutation of
    /// all scenes.
    pub fn shuffle_daily_queue(&mut self) {
        let mut order = self.scenes.clone();
        for i in (1..order.len()).rev() {
            let j = self.pick_index(i + 1);
            order.swap(i, j);
        }
        self.queue = order.into();
        self.queue_started = true;
    }

    /// Pops the next scene of the rotation queue. An exhausted queue starts a
    /// new day and is reshuffled; the very first pop shuffles without
    /// advancing the day.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyBank` if no scenes are registered.
    pub fn pop_next_from_queue(&mut self) -> Result<Arc<Scene>, GameError> {
        if self.scenes.is_empty() {
            return Err(GameError::EmptyBank);
        }
        if self.queue.is_empty() {
            if self.queue_started {
                self.start_new_day();
            }
            self.shuffle_daily_queue();
        }

        let scene = self.queue.pop_front().ok_or(GameError::EmptyBank)?;
        self.mark_played(&scene);
        debug!(scene_id = %scene.id, day = self.day, remaining = self.queue.len(), "popped queued scene");
        Ok(scene)
    }

    /// Selects the next scene according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyBank` if no scenes are registered.
    pub fn select_next(&mut self, policy: SelectionPolicy) -> Result<Arc<Scene>, GameError> {
        match policy {
            SelectionPolicy::Random => self.select_random_unplayed(),
            SelectionPolicy::Queue => self.pop_next_from_queue(),
        }
    }

    /// Forgets all daily progress: played-today, day counter, active scene,
    /// and rotation queue.
    pub fn reset_daily_progress(&mut self) {
        self.played_today.clear();
        self.day = 1;
        self.active = None;
        self.queue.clear();
        self.queue_started = false;
    }

    /// Restores the day counter from saved progress.
    pub fn restore_day(&mut self, day: u32) {
        self.day = day.max(1);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Scene>> {
        self.index.get(id).map(|&i| Arc::clone(&self.scenes[i]))
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub fn active_scene(&self) -> Option<&Arc<Scene>> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_played_today(&self, id: &str) -> bool {
        self.played_today.contains(id)
    }

    #[must_use]
    pub fn played_today_count(&self) -> usize {
        self.played_today.len()
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    fn start_new_day(&mut self) {
        self.played_today.clear();
        self.day = self.day.saturating_add(1);
        info!(day = self.day, "all scenes played, starting a new day");
    }

    fn mark_played(&mut self, scene: &Arc<Scene>) {
        self.played_today.insert(scene.id.clone());
        self.active = Some(Arc::clone(scene));
    }

    /// Uniform index in `[0, len)`; `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let max = u32::try_from(len - 1).unwrap_or(u32::MAX);
        let raw = self.rng.next_u32_range(0, max);
        usize::try_from(raw).map_or(len - 1, |i| i.min(len - 1))
    }
}
