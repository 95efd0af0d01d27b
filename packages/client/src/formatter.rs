//! Message formatting utilities for client display.

use chrono::{DateTime, Local, Utc};
use keyrace_shared::protocol::RoomSnapshot;

use crate::typing::TypingStats;

const RULE: &str = "============================================================";
const BAR_WIDTH: usize = 20;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a local timestamp as wall-clock time (`HH:MM:SS.mmm`)
    pub fn format_local_time(local_millis: i64) -> String {
        match DateTime::<Utc>::from_timestamp_millis(local_millis) {
            Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S%.3f").to_string(),
            None => local_millis.to_string(),
        }
    }

    pub fn format_welcome(player_id: &str, offset_ms: f64) -> String {
        format!(
            "\nConnected as {} (clock offset {:+.1} ms). Type /help for commands.\n",
            player_id, offset_ms
        )
    }

    /// Format the roster of a room
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The room snapshot to render
    /// * `me` - The current player's id (to mark as "me")
    pub fn format_room_state(snapshot: &RoomSnapshot, me: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!(
            "Room {} (v{}): \"{}\"\n",
            snapshot.room, snapshot.version, snapshot.text
        ));

        if snapshot.players.is_empty() {
            output.push_str("(No players)\n");
        }
        for player in &snapshot.players {
            let is_host = snapshot.host.as_deref() == Some(player.id.as_str());
            let is_me = me == Some(player.id.as_str());
            let position = snapshot
                .finished_order
                .iter()
                .position(|id| *id == player.id)
                .map(|i| format!(" #{}", i + 1))
                .unwrap_or_default();
            output.push_str(&format!(
                "{}{}{} [{}] {:>3.0}% {:>5.1} wpm {:>5.1}%{}{}\n",
                player.name,
                if is_host { " *" } else { "" },
                if is_me { " (me)" } else { "" },
                Self::progress_bar(player.progress),
                player.progress * 100.0,
                player.wpm,
                player.accuracy,
                if player.ready { " ready" } else { "" },
                position,
            ));
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_race_started(start_local: i64) -> String {
        format!(
            "\nRace starts at {} (local time)\n",
            Self::format_local_time(start_local)
        )
    }

    /// Countdown line shown while input is locked
    pub fn format_countdown(remaining_ms: i64) -> String {
        let seconds = (remaining_ms + 999) / 1_000;
        format!("\rStarting in {}...", seconds)
    }

    pub fn format_go(text: &str) -> String {
        format!("\nGO! Type:\n{}\n", text)
    }

    pub fn format_progress(stats: &TypingStats, remaining: &str) -> String {
        if remaining.is_empty() {
            return format!(
                "Finished! {:.1} wpm, {:.1}% accuracy\n",
                stats.wpm, stats.accuracy
            );
        }
        format!(
            "{:.0}% {:.1} wpm {:.1}% | next: {}\n",
            stats.progress * 100.0,
            stats.wpm,
            stats.accuracy,
            remaining
        )
    }

    pub fn format_locked() -> String {
        "Input is locked until the race starts\n".to_string()
    }

    pub fn format_error(error: &str) -> String {
        format!("\n! {}\n", error)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn progress_bar(progress: f64) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
        format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}
