//! Playback session state: the cursor into the sentence stream.
//!
//! The session owns the loaded sentence list, its derived duration table and
//! the live [`PlaybackCursor`]. Pipeline stages never touch the cursor; the
//! session is the only writer. Callers that share a session across threads
//! wrap it via [`PlaybackSession::into_shared`] so updates serialize behind
//! one mutex, last writer wins.

use crate::config::PlaybackSettings;
use crate::playback::{
    compute_adaptive_speed, estimate_durations, locate_sentence, sentence_start_time,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

/// Live pointer into the computed sentence/duration sequences.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackCursor {
    pub position_seconds: f64,
    pub speed: f64,
    pub sentence_index: usize,
    pub session_start: Instant,
}

/// Coarse lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackLifecycle {
    /// No book loaded.
    Idle,
    /// Book loaded, cursor valid, not playing.
    Ready,
    Playing,
}

/// Snapshot handed to the presentation layer for highlighting and seeking.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSnapshot {
    pub lifecycle: PlaybackLifecycle,
    pub durations: Vec<f64>,
    pub sentence_index: usize,
    pub position_seconds: f64,
    pub speed: f64,
}

pub struct PlaybackSession {
    settings: PlaybackSettings,
    sentences: Vec<String>,
    durations: Vec<f64>,
    lifecycle: PlaybackLifecycle,
    cursor: PlaybackCursor,
}

impl PlaybackSession {
    pub fn new(settings: PlaybackSettings) -> Self {
        let cursor = PlaybackCursor {
            position_seconds: 0.0,
            speed: clamp_speed(settings.start_speed, &settings),
            sentence_index: 0,
            session_start: Instant::now(),
        };
        PlaybackSession {
            settings,
            sentences: Vec::new(),
            durations: Vec::new(),
            lifecycle: PlaybackLifecycle::Idle,
            cursor,
        }
    }

    /// Replace the loaded book wholesale and reset the cursor.
    ///
    /// Importing always recomputes the full duration table and starts a fresh
    /// session clock at the configured starting speed.
    pub fn load_book(&mut self, sentences: Vec<String>) {
        info!(sentences = sentences.len(), "Loading book into playback session");
        self.sentences = sentences;
        self.cursor = PlaybackCursor {
            position_seconds: 0.0,
            speed: clamp_speed(self.settings.start_speed, &self.settings),
            sentence_index: 0,
            session_start: Instant::now(),
        };
        self.recompute_durations();
        self.lifecycle = PlaybackLifecycle::Ready;
    }

    /// Apply a partial cursor update; each field is independently optional.
    pub fn update(&mut self, position_seconds: Option<f64>, speed: Option<f64>) {
        if self.lifecycle == PlaybackLifecycle::Idle {
            debug!("Ignoring cursor update with no book loaded");
            return;
        }
        if let Some(position) = position_seconds {
            self.cursor.position_seconds = position.max(0.0);
        }
        if let Some(speed) = speed {
            self.cursor.speed = clamp_speed(speed, &self.settings);
            self.recompute_durations();
        }
        self.relocate();
    }

    /// Move the cursor to a position and recompute the sentence under it.
    pub fn sync_to_position(&mut self, position_seconds: f64) {
        if self.lifecycle == PlaybackLifecycle::Idle {
            debug!("Ignoring position sync with no book loaded");
            return;
        }
        self.cursor.position_seconds = position_seconds.max(0.0);
        self.relocate();
    }

    /// Jump the cursor to the start of a sentence; the inverse of
    /// [`Self::sync_to_position`]. Out-of-range indexes clamp to the last
    /// sentence.
    pub fn seek_to_sentence(&mut self, index: usize) {
        if self.lifecycle == PlaybackLifecycle::Idle || self.durations.is_empty() {
            return;
        }
        let clamped = index.min(self.durations.len() - 1);
        self.cursor.position_seconds = sentence_start_time(&self.durations, clamped);
        self.cursor.sentence_index = clamped;
    }

    /// Re-derive the speed from the adaptive ramp and elapsed session time.
    pub fn apply_adaptive_speed(&mut self, now: Instant) {
        if self.lifecycle == PlaybackLifecycle::Idle {
            return;
        }
        let ramped = compute_adaptive_speed(
            self.cursor.session_start,
            now,
            self.settings.start_speed,
            self.settings.speed_increment,
            self.settings.speed_interval_minutes,
            self.settings.max_speed,
        );
        let clamped = clamp_speed(ramped, &self.settings);
        if (clamped - self.cursor.speed).abs() > f64::EPSILON {
            debug!(speed = clamped, "Adaptive ramp changed playback speed");
            self.cursor.speed = clamped;
            self.recompute_durations();
            self.relocate();
        }
    }

    pub fn play(&mut self) {
        if self.lifecycle == PlaybackLifecycle::Ready && !self.sentences.is_empty() {
            self.lifecycle = PlaybackLifecycle::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.lifecycle == PlaybackLifecycle::Playing {
            self.lifecycle = PlaybackLifecycle::Ready;
        }
    }

    /// Drop the loaded book and return to idle with a zeroed cursor.
    pub fn close(&mut self) {
        info!("Closing playback session");
        self.sentences.clear();
        self.durations.clear();
        self.cursor = PlaybackCursor {
            position_seconds: 0.0,
            speed: clamp_speed(self.settings.start_speed, &self.settings),
            sentence_index: 0,
            session_start: Instant::now(),
        };
        self.lifecycle = PlaybackLifecycle::Idle;
    }

    pub fn lifecycle(&self) -> PlaybackLifecycle {
        self.lifecycle
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            lifecycle: self.lifecycle,
            durations: self.durations.clone(),
            sentence_index: self.cursor.sentence_index,
            position_seconds: self.cursor.position_seconds,
            speed: self.cursor.speed,
        }
    }

    /// Wrap the session for shared use; all mutation serializes behind the
    /// mutex (single-writer discipline for the cursor).
    pub fn into_shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }

    fn recompute_durations(&mut self) {
        self.durations = estimate_durations(
            &self.sentences,
            self.cursor.speed,
            self.settings.words_per_minute,
            self.settings.min_sentence_secs,
        );
    }

    fn relocate(&mut self) {
        if self.durations.is_empty() {
            self.cursor.sentence_index = 0;
            return;
        }
        self.cursor.sentence_index =
            locate_sentence(&self.durations, self.cursor.position_seconds);
    }
}

fn clamp_speed(speed: f64, settings: &PlaybackSettings) -> f64 {
    let max = settings.max_speed.max(settings.min_speed);
    speed.clamp(settings.min_speed, max)
}
