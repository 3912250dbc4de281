//! Plain-text rendering of the view model.
//!
//! Layout mirrors the page: banners above the form, then the card list.

use crate::ui::clock::Clock;
use crate::ui::view::{Card, FormState, ViewModel};

const EMPTY_LIST_LINE: &str = "(no users yet)\n";

/// Renders banners, form and cards as display lines.
pub fn render_view<C: Clock>(view: &ViewModel<C>) -> String {
    let mut out: String = view
        .banners()
        .map(|banner| format!("[{}] {}\n", banner.severity.as_str(), banner.message))
        .collect();
    if view.pending_banners() > 0 {
        out.push_str(&format!("(+{} queued)\n", view.pending_banners()));
    }

    out.push_str(&render_form(view.form()));
    out.push('\n');

    if view.cards().is_empty() {
        out.push_str(EMPTY_LIST_LINE);
    }
    for (index, card) in view.cards().iter().enumerate() {
        out.push_str(&render_card(index + 1, card));
    }
    out
}

fn render_form(form: &FormState) -> String {
    let add_state = if form.add_button_disabled {
        "disabled"
    } else {
        "enabled"
    };
    format!(
        "Name:  {}\nEmail: {}\n<{}>  (add button {add_state})\n",
        form.name,
        form.email,
        form.submit_action.label()
    )
}

/// One card block, numbered from 1.
pub fn render_card(number: usize, card: &Card) -> String {
    format!(
        "{number}. {}\n   Email: {}\n   [Edit] [Delete]\n",
        card.record.name, card.record.email
    )
}
