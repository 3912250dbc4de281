//! View model for the contact page.
//!
//! # Responsibility
//! - Implement `Presentation` over an in-memory visual tree.
//! - Schedule and expire notification banners against an injected clock.
//!
//! # Invariants
//! - Card order matches the order records were rendered.
//! - Each banner expires by its own deadline; removing one banner never
//!   removes another.
//! - In `BannerMode::Queue` at most one banner is visible.

use crate::model::record::Record;
use crate::ui::clock::{Clock, SystemClock};
use log::debug;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Delay before a banner removes itself.
pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(3);

/// View-level identity of one rendered card.
pub type CardId = Uuid;
/// Handle returned by `Presentation::notify`.
pub type BannerId = Uuid;

/// Banner styling class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

/// How overlapping notifications are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BannerMode {
    /// Every banner shows immediately and expires on its own timer.
    #[default]
    Overlay,
    /// One banner at a time; later ones wait for the current one to go.
    Queue,
}

/// What the submit button currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitAction {
    #[default]
    Add,
    Update,
}

impl SubmitAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add User",
            Self::Update => "Update User",
        }
    }
}

/// Form inputs and button affordances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub submit_action: SubmitAction,
    /// The primary add button is disabled while editing.
    pub add_button_disabled: bool,
}

/// One rendered contact card with Edit/Delete controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub record: Record,
}

/// One notification banner above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub message: String,
    pub severity: Severity,
    expires_at: Instant,
}

/// Rendering contract the controller drives.
pub trait Presentation {
    /// Clears the card list and renders one card per record.
    fn render_all(&mut self, records: &[Record]);
    /// Appends one card without clearing.
    fn render_one(&mut self, record: &Record) -> CardId;
    /// Record shown on card `id`, if that card is still rendered.
    fn card_record(&self, id: CardId) -> Option<Record>;
    /// Removes exactly card `id`; returns whether it was rendered.
    fn remove_card(&mut self, id: CardId) -> bool;
    /// Removes every card showing `email`; returns how many went.
    fn remove_cards_for(&mut self, email: &str) -> usize;
    /// Resets both inputs to empty strings.
    fn clear_form(&mut self);
    /// Shows a banner that removes itself after the configured delay.
    fn notify(&mut self, message: &str, severity: Severity) -> BannerId;
    /// Fills the form with `record` and switches the buttons to update mode.
    fn enter_edit_mode(&mut self, record: &Record);
    /// Switches the buttons back to add mode.
    fn exit_edit_mode(&mut self);
}

/// In-memory visual tree implementing `Presentation`.
pub struct ViewModel<C: Clock = SystemClock> {
    cards: Vec<Card>,
    form: FormState,
    banners: VecDeque<Banner>,
    pending: VecDeque<Banner>,
    banner_ttl: Duration,
    banner_mode: BannerMode,
    clock: C,
}

impl ViewModel<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ViewModel<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ViewModel<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            cards: Vec::new(),
            form: FormState::default(),
            banners: VecDeque::new(),
            pending: VecDeque::new(),
            banner_ttl: DEFAULT_BANNER_TTL,
            banner_mode: BannerMode::default(),
            clock,
        }
    }

    pub fn with_banner_ttl(mut self, ttl: Duration) -> Self {
        self.banner_ttl = ttl;
        self
    }

    pub fn with_banner_mode(mut self, mode: BannerMode) -> Self {
        self.banner_mode = mode;
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card at a 0-based position in the list.
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Direct access to the inputs, as a user typing into them.
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Banners currently visible, oldest first.
    pub fn banners(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter()
    }

    /// Banners waiting to be shown (queue mode only).
    pub fn pending_banners(&self) -> usize {
        self.pending.len()
    }

    /// Removes every visible banner whose deadline has passed.
    ///
    /// In queue mode a promoted banner's deadline starts when its predecessor
    /// expired, so infrequent calls still expire a backlog deterministically.
    /// Returns the removed handles in removal order.
    pub fn dismiss_expired(&mut self) -> Vec<BannerId> {
        let now = self.clock.now();
        let mut removed = Vec::new();

        loop {
            let Some(position) = self
                .banners
                .iter()
                .position(|banner| banner.expires_at <= now)
            else {
                break;
            };
            let Some(banner) = self.banners.remove(position) else {
                break;
            };
            removed.push(banner.id);
            self.promote_pending(banner.expires_at);
        }

        if !removed.is_empty() {
            debug!(
                "event=banner_expire module=ui status=ok removed={}",
                removed.len()
            );
        }
        removed
    }

    /// Removes one banner by handle, visible or queued.
    pub fn dismiss(&mut self, id: BannerId) -> bool {
        if let Some(position) = self.banners.iter().position(|banner| banner.id == id) {
            self.banners.remove(position);
            let now = self.clock.now();
            self.promote_pending(now);
            return true;
        }
        if let Some(position) = self.pending.iter().position(|banner| banner.id == id) {
            self.pending.remove(position);
            return true;
        }
        false
    }

    fn promote_pending(&mut self, from: Instant) {
        if self.banner_mode != BannerMode::Queue || !self.banners.is_empty() {
            return;
        }
        if let Some(mut next) = self.pending.pop_front() {
            next.expires_at = from + self.banner_ttl;
            self.banners.push_back(next);
        }
    }
}

impl<C: Clock> Presentation for ViewModel<C> {
    fn render_all(&mut self, records: &[Record]) {
        self.cards = records
            .iter()
            .map(|record| Card {
                id: Uuid::new_v4(),
                record: record.clone(),
            })
            .collect();
    }

    fn render_one(&mut self, record: &Record) -> CardId {
        let id = Uuid::new_v4();
        self.cards.push(Card {
            id,
            record: record.clone(),
        });
        id
    }

    fn card_record(&self, id: CardId) -> Option<Record> {
        self.cards
            .iter()
            .find(|card| card.id == id)
            .map(|card| card.record.clone())
    }

    fn remove_card(&mut self, id: CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| card.id != id);
        self.cards.len() != before
    }

    fn remove_cards_for(&mut self, email: &str) -> usize {
        let before = self.cards.len();
        self.cards.retain(|card| card.record.email != email);
        before - self.cards.len()
    }

    fn clear_form(&mut self) {
        self.form.name.clear();
        self.form.email.clear();
    }

    fn notify(&mut self, message: &str, severity: Severity) -> BannerId {
        let id = Uuid::new_v4();
        let banner = Banner {
            id,
            message: message.to_string(),
            severity,
            expires_at: self.clock.now() + self.banner_ttl,
        };

        if self.banner_mode == BannerMode::Queue && !self.banners.is_empty() {
            self.pending.push_back(banner);
        } else {
            self.banners.push_back(banner);
        }
        id
    }

    fn enter_edit_mode(&mut self, record: &Record) {
        self.form.name = record.name.clone();
        self.form.email = record.email.clone();
        self.form.submit_action = SubmitAction::Update;
        self.form.add_button_disabled = true;
    }

    fn exit_edit_mode(&mut self) {
        self.form.submit_action = SubmitAction::Add;
        self.form.add_button_disabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{BannerMode, Presentation, Severity, SubmitAction, ViewModel};
    use crate::model::record::Record;
    use crate::ui::clock::ManualClock;
    use std::time::Duration;

    fn view(mode: BannerMode) -> (ViewModel<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let view = ViewModel::with_clock(clock.clone()).with_banner_mode(mode);
        (view, clock)
    }

    #[test]
    fn banner_expires_after_three_seconds() {
        let (mut view, clock) = view(BannerMode::Overlay);
        let id = view.notify("User added", Severity::Success);

        clock.advance(Duration::from_millis(2999));
        assert!(view.dismiss_expired().is_empty());
        assert_eq!(view.banners().count(), 1);

        clock.advance(Duration::from_millis(1));
        assert_eq!(view.dismiss_expired(), vec![id]);
        assert_eq!(view.banners().count(), 0);
    }

    #[test]
    fn overlapping_banners_expire_by_their_own_deadline() {
        let (mut view, clock) = view(BannerMode::Overlay);
        let first = view.notify("User added", Severity::Success);
        clock.advance(Duration::from_secs(1));
        let second = view.notify("User deleted", Severity::Success);
        assert_eq!(view.banners().count(), 2);

        clock.advance(Duration::from_secs(2));
        assert_eq!(view.dismiss_expired(), vec![first]);
        let remaining: Vec<_> = view.banners().map(|banner| banner.id).collect();
        assert_eq!(remaining, vec![second]);

        clock.advance(Duration::from_secs(1));
        assert_eq!(view.dismiss_expired(), vec![second]);
    }

    #[test]
    fn manual_dismiss_only_removes_its_own_banner() {
        let (mut view, _clock) = view(BannerMode::Overlay);
        let first = view.notify("a", Severity::Info);
        let second = view.notify("b", Severity::Info);

        assert!(view.dismiss(second));
        assert!(!view.dismiss(second));
        let remaining: Vec<_> = view.banners().map(|banner| banner.id).collect();
        assert_eq!(remaining, vec![first]);
    }

    #[test]
    fn queue_mode_shows_one_banner_at_a_time() {
        let (mut view, clock) = view(BannerMode::Queue);
        let first = view.notify("first", Severity::Success);
        let second = view.notify("second", Severity::Info);
        let third = view.notify("third", Severity::Danger);
        assert_eq!(view.banners().count(), 1);
        assert_eq!(view.pending_banners(), 2);

        clock.advance(Duration::from_secs(3));
        assert_eq!(view.dismiss_expired(), vec![first]);
        assert_eq!(view.banners().next().map(|banner| banner.id), Some(second));

        // A late tick expires the backlog along a continuous timeline.
        clock.advance(Duration::from_secs(6));
        assert_eq!(view.dismiss_expired(), vec![second, third]);
        assert_eq!(view.pending_banners(), 0);
    }

    #[test]
    fn queue_mode_dismiss_promotes_next_with_fresh_deadline() {
        let (mut view, clock) = view(BannerMode::Queue);
        let first = view.notify("first", Severity::Success);
        let second = view.notify("second", Severity::Success);

        clock.advance(Duration::from_secs(2));
        assert!(view.dismiss(first));
        assert_eq!(view.banners().next().map(|banner| banner.id), Some(second));

        clock.advance(Duration::from_secs(2));
        assert!(view.dismiss_expired().is_empty());
        clock.advance(Duration::from_secs(1));
        assert_eq!(view.dismiss_expired(), vec![second]);
    }

    #[test]
    fn edit_mode_fills_form_and_toggles_buttons() {
        let (mut view, _clock) = view(BannerMode::Overlay);
        view.enter_edit_mode(&Record::new("Ann", "a@x.com"));
        assert_eq!(view.form().name, "Ann");
        assert_eq!(view.form().email, "a@x.com");
        assert_eq!(view.form().submit_action, SubmitAction::Update);
        assert!(view.form().add_button_disabled);

        view.exit_edit_mode();
        view.clear_form();
        assert_eq!(view.form().submit_action.label(), "Add User");
        assert!(!view.form().add_button_disabled);
        assert!(view.form().name.is_empty());
    }

    #[test]
    fn remove_card_targets_one_handle_among_duplicates() {
        let (mut view, _clock) = view(BannerMode::Overlay);
        view.render_all(&[Record::new("Ann", "a@x.com"), Record::new("Bob", "b@x.com")]);
        let newer = view.render_one(&Record::new("Ann again", "a@x.com"));

        assert!(view.remove_card(newer));
        assert!(!view.remove_card(newer));
        assert_eq!(view.card_record(newer), None);
        assert_eq!(names(&view), vec!["Ann", "Bob"]);
    }

    #[test]
    fn remove_cards_for_clears_every_duplicate() {
        let (mut view, _clock) = view(BannerMode::Overlay);
        view.render_all(&[
            Record::new("Ann", "a@x.com"),
            Record::new("Bob", "b@x.com"),
            Record::new("Ann again", "a@x.com"),
        ]);

        assert_eq!(view.remove_cards_for("a@x.com"), 2);
        assert_eq!(view.remove_cards_for("c@x.com"), 0);
        assert_eq!(names(&view), vec!["Bob"]);
    }

    fn names(view: &ViewModel<ManualClock>) -> Vec<&str> {
        view.cards()
            .iter()
            .map(|card| card.record.name.as_str())
            .collect()
    }
}
