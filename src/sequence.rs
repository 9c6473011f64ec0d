//! Sequence model
//!
//! An immutable, 1-indexed list of panels and their paired selectors.
//! Built once per session and never mutated afterwards.

use crate::error::CycleError;

/// One content unit in the rotating sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// 1-based position in the sequence
    pub index: usize,
    /// Opaque content, only interpreted by the presenter
    pub content: String,
}

/// The control paired one-to-one with a [`Panel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    /// Index of the paired panel
    pub index: usize,
}

impl Selector {
    /// Whether this selector is the highlighted one for `active_index`.
    #[must_use]
    pub const fn is_highlighted(self, active_index: Option<usize>) -> bool {
        matches!(active_index, Some(active) if active == self.index)
    }

    /// Label shown for the selector, e.g. `"3"` or `"03"` with `lead_zero`.
    #[must_use]
    pub fn label(self, lead_zero: bool) -> String {
        if lead_zero && self.index < 10 {
            format!("0{}", self.index)
        } else {
            self.index.to_string()
        }
    }
}

/// Ordered, read-only list of panels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceModel {
    panels: Vec<Panel>,
}

impl SequenceModel {
    /// Build a sequence from panel contents in display order.
    #[must_use]
    pub fn from_contents<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let panels = contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| Panel {
                index: i + 1,
                content: content.into(),
            })
            .collect();
        Self { panels }
    }

    /// Number of panels (N).
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Whether `index` is in `[1, N]`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (1..=self.panels.len()).contains(&index)
    }

    /// Look up a panel by its 1-based index.
    pub fn panel_at(&self, index: usize) -> Result<&Panel, CycleError> {
        self.check(index)?;
        Ok(&self.panels[index - 1])
    }

    /// Look up the selector paired with the panel at `index`.
    pub fn selector_at(&self, index: usize) -> Result<Selector, CycleError> {
        self.check(index)?;
        Ok(Selector { index })
    }

    /// All panels in order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    /// All selectors in order.
    pub fn selectors(&self) -> impl Iterator<Item = Selector> + '_ {
        self.panels.iter().map(|p| Selector { index: p.index })
    }

    fn check(&self, index: usize) -> Result<(), CycleError> {
        if self.contains(index) {
            Ok(())
        } else {
            Err(CycleError::IndexOutOfRange {
                index,
                count: self.panel_count(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four() -> SequenceModel {
        SequenceModel::from_contents(["one", "two", "three", "four"])
    }

    #[test]
    fn test_panels_are_one_indexed() {
        let seq = four();
        assert_eq!(seq.panel_count(), 4);
        assert_eq!(seq.panel_at(1).unwrap().content, "one");
        assert_eq!(seq.panel_at(4).unwrap().content, "four");
        assert_eq!(seq.panel_at(3).unwrap().index, 3);
    }

    #[test]
    fn test_panel_at_rejects_zero_and_past_end() {
        let seq = four();
        assert_eq!(
            seq.panel_at(0).unwrap_err(),
            CycleError::IndexOutOfRange { index: 0, count: 4 }
        );
        assert_eq!(
            seq.panel_at(5).unwrap_err(),
            CycleError::IndexOutOfRange { index: 5, count: 4 }
        );
    }

    #[test]
    fn test_selector_pairs_with_panel() {
        let seq = four();
        for i in 1..=4 {
            assert_eq!(seq.selector_at(i).unwrap().index, seq.panel_at(i).unwrap().index);
        }
        assert!(seq.selector_at(5).is_err());
    }

    #[test]
    fn test_empty_sequence() {
        let seq = SequenceModel::default();
        assert_eq!(seq.panel_count(), 0);
        assert!(!seq.contains(1));
        assert!(seq.panel_at(1).is_err());
        assert!(seq.selector_at(1).is_err());
    }

    #[test]
    fn test_selector_highlight_is_derived() {
        let sel = Selector { index: 2 };
        assert!(sel.is_highlighted(Some(2)));
        assert!(!sel.is_highlighted(Some(3)));
        assert!(!sel.is_highlighted(None));
    }

    #[test]
    fn test_selector_label_lead_zero() {
        assert_eq!(Selector { index: 3 }.label(false), "3");
        assert_eq!(Selector { index: 3 }.label(true), "03");
        assert_eq!(Selector { index: 12 }.label(true), "12");
    }

    #[test]
    fn test_selectors_iterate_in_order() {
        let indices: Vec<usize> = four().selectors().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }
}
