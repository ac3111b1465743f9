use tabled::{
    Table,
    settings::{Style, object::Rows, style::LineText},
};

use super::TabStyle;

pub(crate) fn apply_style(table: &mut Table, style: TabStyle) {
    match style {
        TabStyle::Rounded => table.with(Style::rounded()),
        TabStyle::Modern => table.with(Style::modern()),
        TabStyle::ModernRounded => table.with(Style::modern_rounded()),
        TabStyle::Ascii => table.with(Style::ascii()),
        TabStyle::Psql => table.with(Style::psql()),
        TabStyle::Markdown => table.with(Style::markdown()),
        TabStyle::Sharp => table.with(Style::sharp()),
        TabStyle::Blank => table.with(Style::blank()),
        TabStyle::Empty => table.with(Style::empty()),
    };
}

/// Write `title` into the top border, or as a header row for styles without one.
pub(crate) fn apply_title(table: &mut Table, style: TabStyle, title: &str) {
    match style {
        TabStyle::Rounded
        | TabStyle::Modern
        | TabStyle::ModernRounded
        | TabStyle::Ascii
        | TabStyle::Sharp => {
            table.with(LineText::new(format!(" {title} "), Rows::first()).offset(1));
        }
        TabStyle::Psql | TabStyle::Markdown | TabStyle::Blank | TabStyle::Empty => {
            table.with(tabled::settings::Panel::header(title));
        }
    }
}
