use contact_model::{Contact, TagRegistry};

use crate::criteria::Criterion;
use crate::error::Result;
use crate::parser::Query;

/// The subset of the collection currently on display.
///
/// Stores positions into the owning collection rather than copies, so the view
/// always reflects the live contacts. `criterion` is `None` when everything is
/// shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    visible: Vec<usize>,
    criterion: Option<Criterion>,
}

impl FilteredView {
    pub fn unfiltered(contacts: &[Contact]) -> Self {
        let mut view = Self::default();
        view.show_all(contacts);
        view
    }

    pub fn show_all(&mut self, contacts: &[Contact]) -> usize {
        self.criterion = None;
        self.visible = (0..contacts.len()).collect();
        self.visible.len()
    }

    /// Replace the current filter. Matches keep collection order.
    pub fn apply(&mut self, criterion: Criterion, contacts: &[Contact]) -> usize {
        self.visible = matching(&criterion, contacts);
        self.criterion = Some(criterion);
        self.visible.len()
    }

    /// Re-run the current filter after the collection changed.
    pub fn refresh(&mut self, contacts: &[Contact]) {
        self.visible = match &self.criterion {
            Some(criterion) => matching(criterion, contacts),
            None => (0..contacts.len()).collect(),
        };
    }

    pub fn criterion(&self) -> Option<&Criterion> {
        self.criterion.as_ref()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Map a 1-based displayed index to a position in the collection.
    pub fn resolve(&self, displayed: usize) -> Option<usize> {
        displayed
            .checked_sub(1)
            .and_then(|offset| self.visible.get(offset))
            .copied()
    }

    pub fn visible<'a>(&'a self, contacts: &'a [Contact]) -> impl Iterator<Item = &'a Contact> + 'a {
        self.visible.iter().filter_map(move |idx| contacts.get(*idx))
    }
}

fn matching(criterion: &Criterion, contacts: &[Contact]) -> Vec<usize> {
    contacts
        .iter()
        .enumerate()
        .filter(|(_, contact)| criterion.matches(contact))
        .map(|(idx, _)| idx)
        .collect()
}

/// Gate the query against the registry, then filter. On error the view is
/// left as it was.
pub fn execute(
    query: &Query,
    registry: &TagRegistry,
    contacts: &[Contact],
    view: &mut FilteredView,
) -> Result<usize> {
    query.gate(registry)?;
    let count = view.apply(query.criterion().clone(), contacts);
    log::debug!("{} of {} contacts match {}", count, contacts.len(), query.criterion());
    Ok(count)
}
