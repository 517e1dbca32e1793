//! Chat history grouped by calendar date.
//!
//! Dates are taken in a caller-supplied time zone (the terminal client uses
//! `chrono::Local`). Groups are ordered newest date first; messages inside a
//! group are ordered oldest first.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};

use crate::models::ChatMessage;

/// All messages sent or received on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub messages: Vec<ChatMessage>,
}

fn local_date<Tz: TimeZone>(message: &ChatMessage, tz: &Tz) -> NaiveDate {
    message.created_at.with_timezone(tz).date_naive()
}

pub fn group_by_date<Tz: TimeZone>(messages: &[ChatMessage], tz: &Tz) -> Vec<DateGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<ChatMessage>> = BTreeMap::new();
    for message in messages {
        by_date
            .entry(local_date(message, tz))
            .or_default()
            .push(message.clone());
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, mut messages)| {
            // Stable sort keeps server order for identical timestamps.
            messages.sort_by_key(|m| m.created_at);
            DateGroup { date, messages }
        })
        .collect()
}

/// The date selected when the history first opens: the most recent one.
pub fn default_date(groups: &[DateGroup]) -> Option<NaiveDate> {
    groups.first().map(|g| g.date)
}

pub fn messages_for_date<Tz: TimeZone>(
    messages: &[ChatMessage],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<ChatMessage> {
    let mut selected: Vec<ChatMessage> = messages
        .iter()
        .filter(|m| local_date(m, tz) == date)
        .cloned()
        .collect();
    selected.sort_by_key(|m| m.created_at);
    selected
}

/// Date list plus the current selection, as shown by the history view.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    groups: Vec<DateGroup>,
    selected: Option<usize>,
}

impl HistoryView {
    pub fn new<Tz: TimeZone>(messages: &[ChatMessage], tz: &Tz) -> Self {
        let groups = group_by_date(messages, tz);
        let selected = if groups.is_empty() { None } else { Some(0) };
        Self { groups, selected }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[DateGroup] {
        &self.groups
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.groups.iter().map(|g| g.date).collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected.and_then(|i| self.groups.get(i)).map(|g| g.date)
    }

    pub fn selected_messages(&self) -> &[ChatMessage] {
        self.selected
            .and_then(|i| self.groups.get(i))
            .map(|g| g.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Select a date by value. Returns false if there is no such date.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        match self.groups.iter().position(|g| g.date == date) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Move to the next (older) date.
    pub fn select_next(&mut self) {
        if let Some(i) = self.selected {
            if i + 1 < self.groups.len() {
                self.selected = Some(i + 1);
            }
        }
    }

    /// Move to the previous (newer) date.
    pub fn select_prev(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }
}
