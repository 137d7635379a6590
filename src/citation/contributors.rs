//! Contributor role assignment

use std::collections::HashSet;

use super::{Contributor, Role};
use crate::page_extractor::Signal;

/// Map raw contributor signals to contributors, preserving input order
///
/// The context tag selects a [`Role`] through the phrase table; untagged or
/// unmatched contributors are plain authors. A repeated name with the same
/// resulting role is kept only at its first position.
pub fn assign_roles(signals: &[Signal]) -> Vec<Contributor> {
    let mut seen = HashSet::new();

    signals
        .iter()
        .filter_map(|signal| {
            let role = signal.context.as_deref().and_then(Role::from_phrase);
            let identity = (signal.value.to_lowercase(), role);
            seen.insert(identity).then(|| Contributor {
                name: signal.value.clone(),
                role,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_contributors_are_authors() {
        let contributors = assign_roles(&[Signal::structured("Jane Doe")]);
        assert_eq!(contributors, vec![Contributor::author("Jane Doe")]);
    }

    #[test]
    fn tagged_contributors_keep_order() {
        let contributors = assign_roles(&[
            Signal::structured("Leo Tolstoy"),
            Signal::heuristic("Jane Smith").with_context("Translated by"),
            Signal::structured("Anne Other").with_context("foreword"),
        ]);

        assert_eq!(
            contributors,
            vec![
                Contributor::author("Leo Tolstoy"),
                Contributor::with_role("Jane Smith", Role::Translator),
                Contributor::with_role("Anne Other", Role::Foreword),
            ]
        );
    }

    #[test]
    fn unknown_tags_default_to_authorship() {
        let contributors = assign_roles(&[Signal::structured("Ed Itor").with_context("edited by")]);
        assert_eq!(contributors, vec![Contributor::author("Ed Itor")]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let contributors = assign_roles(&[
            Signal::structured("Jane Doe"),
            Signal::structured("John Roe"),
            Signal::semantic("jane doe"),
            Signal::semantic("Jane Doe").with_context("directed by"),
        ]);

        assert_eq!(
            contributors,
            vec![
                Contributor::author("Jane Doe"),
                Contributor::author("John Roe"),
                Contributor::with_role("Jane Doe", Role::Director),
            ]
        );
    }
}
