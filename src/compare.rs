use crate::models::University;

/// Universities picked for side-by-side comparison, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSelection {
    ids: Vec<u32>,
}

impl ComparisonSelection {
    pub const MINIMUM: usize = 2;

    /// Returns false when the id was already selected.
    pub fn add(&mut self, university_id: u32) -> bool {
        if self.ids.contains(&university_id) {
            return false;
        }
        self.ids.push(university_id);
        true
    }

    pub fn remove(&mut self, university_id: u32) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| *id != university_id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.ids.len() >= Self::MINIMUM
    }

    /// Selected records in catalog order; ids missing from the catalog are skipped.
    pub fn selected(&self, universities: &[University]) -> Vec<University> {
        universities
            .iter()
            .filter(|university| self.ids.contains(&university.id))
            .cloned()
            .collect()
    }
}

impl FromIterator<u32> for ComparisonSelection {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut selection = ComparisonSelection::default();
        for id in iter {
            selection.add(id);
        }
        selection
    }
}
