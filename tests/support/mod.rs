#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use studio_player::audio::{AudioBackend, AudioHandle, EngineEvent, PlayOutcome};
use studio_player::model::Track;

/// Engine state shared between the test body and the handles it hands out.
#[derive(Debug)]
struct Script {
    play_outcomes: VecDeque<PlayOutcome>,
    opened: Vec<String>,
    open_attempts: usize,
    live: usize,
    paused: bool,
    position: Duration,
    duration: Duration,
    volume: f32,
    muted: bool,
    events: Vec<EngineEvent>,
    fail_next_open: Option<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            play_outcomes: VecDeque::new(),
            opened: Vec::new(),
            open_attempts: 0,
            live: 0,
            paused: true,
            position: Duration::ZERO,
            duration: Duration::from_secs(180),
            volume: 1.0,
            muted: false,
            events: Vec::new(),
            fail_next_open: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Rc<RefCell<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn AudioBackend> {
        Box::new(self.clone())
    }

    /// Outcome of the next `play()`; unqueued plays start.
    pub fn queue_play(&self, outcome: PlayOutcome) {
        self.script.borrow_mut().play_outcomes.push_back(outcome);
    }

    /// The host pausing output behind the player's back, e.g. during a route change.
    pub fn suspend(&self) {
        let mut script = self.script.borrow_mut();
        script.paused = true;
        script.events.push(EngineEvent::Paused);
    }

    pub fn finish(&self) {
        self.script.borrow_mut().events.push(EngineEvent::Ended);
    }

    pub fn report(&self, event: EngineEvent) {
        self.script.borrow_mut().events.push(event);
    }

    pub fn set_position(&self, seconds: f64) {
        self.script.borrow_mut().position = Duration::from_secs_f64(seconds);
    }

    pub fn fail_next_open(&self, reason: &str) {
        self.script.borrow_mut().fail_next_open = Some(reason.to_string());
    }

    pub fn live_handles(&self) -> usize {
        self.script.borrow().live
    }

    /// Every `open` call, including the ones that failed.
    pub fn open_attempts(&self) -> usize {
        self.script.borrow().open_attempts
    }

    pub fn opened(&self) -> Vec<String> {
        self.script.borrow().opened.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.script.borrow().paused
    }

    pub fn position(&self) -> f64 {
        self.script.borrow().position.as_secs_f64()
    }

    pub fn volume(&self) -> f32 {
        self.script.borrow().volume
    }

    pub fn muted(&self) -> bool {
        self.script.borrow().muted
    }
}

impl AudioBackend for ScriptedBackend {
    fn open(&mut self, track: &Track) -> anyhow::Result<Box<dyn AudioHandle>> {
        let mut script = self.script.borrow_mut();
        script.open_attempts += 1;
        if let Some(reason) = script.fail_next_open.take() {
            anyhow::bail!("{reason}");
        }
        script.opened.push(track.title.clone());
        script.live += 1;
        script.paused = true;
        script.position = Duration::ZERO;
        script.events.clear();
        Ok(Box::new(ScriptedHandle {
            script: Rc::clone(&self.script),
            attached: true,
        }))
    }

    fn name(&self) -> String {
        String::from("scripted")
    }
}

struct ScriptedHandle {
    script: Rc<RefCell<Script>>,
    attached: bool,
}

impl AudioHandle for ScriptedHandle {
    fn play(&mut self) -> PlayOutcome {
        if !self.attached {
            return PlayOutcome::Blocked;
        }
        let mut script = self.script.borrow_mut();
        let outcome = script
            .play_outcomes
            .pop_front()
            .unwrap_or(PlayOutcome::Started);
        if outcome == PlayOutcome::Started {
            script.paused = false;
        }
        outcome
    }

    fn pause(&mut self) {
        if self.attached {
            self.script.borrow_mut().paused = true;
        }
    }

    fn seek(&mut self, position: Duration) -> anyhow::Result<()> {
        let mut script = self.script.borrow_mut();
        script.position = position.min(script.duration);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.script.borrow_mut().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.script.borrow_mut().muted = muted;
    }

    fn position(&self) -> Duration {
        self.script.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        Some(self.script.borrow().duration)
    }

    fn is_paused(&self) -> bool {
        !self.attached || self.script.borrow().paused
    }

    fn poll_events(&mut self, out: &mut Vec<EngineEvent>) {
        if self.attached {
            out.append(&mut self.script.borrow_mut().events);
        }
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        let mut script = self.script.borrow_mut();
        script.live -= 1;
        script.paused = true;
        script.events.clear();
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

pub fn tracks(count: usize) -> Vec<Track> {
    (0..count)
        .map(|index| {
            Track::new(
                &format!("Reel {index}"),
                "Studio",
                "",
                &format!("music/reel-{index}.mp3"),
            )
        })
        .collect()
}
