/// An input item that may or may not carry usable text.
///
/// `None` stands for a null or absent item coming from the caller.
pub trait EntryText {
    fn entry_text(&self) -> Option<&str>;
}

impl EntryText for str {
    fn entry_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl EntryText for String {
    fn entry_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: EntryText + ?Sized> EntryText for &T {
    fn entry_text(&self) -> Option<&str> {
        (**self).entry_text()
    }
}

impl<T: EntryText> EntryText for Option<T> {
    fn entry_text(&self) -> Option<&str> {
        self.as_ref().and_then(EntryText::entry_text)
    }
}

/// Trimmed text of every valid entry, in input order.
///
/// Absent, empty and whitespace-only items are dropped silently.
pub fn valid_entries<E: EntryText>(entries: &[E]) -> Vec<&str> {
    entries
        .iter()
        .filter_map(EntryText::entry_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}
