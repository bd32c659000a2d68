use std::collections::HashMap;

use indexmap::IndexMap;
use stylepack_core::plugin::StylesheetTransformerPlugin;
use stylepack_core::printer::ToCss;
use stylepack_core::types::{Declaration, Media, Rule, Ruleset, StyleSheet};

/// Merges rulesets that share a selector group and de-duplicates their
/// declarations, shrinking output without changing what the cascade
/// resolves.
///
/// Top-level rules are re-keyed through an insertion-ordered map, so rules
/// that never collide keep their source order. When a selector group
/// reappears, the later ruleset is normally collapsed into the earlier one;
/// if a rule in between declared one of the earlier ruleset's properties
/// with a different value, collapsing would reorder a later-wins cascade,
/// so the new ruleset is kept as a separate entry under a synthetic key
/// instead. Synthetic keys use an incrementing counter, which keeps output
/// byte-identical across runs.
#[derive(Debug, Default)]
pub struct MergeOptimizer {
  merge_media: bool,
}

impl MergeOptimizer {
  pub fn new(merge_media: bool) -> Self {
    MergeOptimizer { merge_media }
  }
}

impl StylesheetTransformerPlugin for MergeOptimizer {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    Ok(StyleSheet {
      rules: merge_rules(stylesheet.rules, self.merge_media),
      ..stylesheet
    })
  }
}

fn merge_rules(rules: Vec<Rule>, merge_media: bool) -> Vec<Rule> {
  let mut entries: IndexMap<String, Rule> = IndexMap::new();
  let mut synthetic_seq = 0usize;

  for rule in rules {
    match rule {
      Rule::Ruleset(ruleset) => {
        if ruleset.declarations.is_empty() && ruleset.important_comments.is_empty() {
          tracing::debug!(
            selector = %ruleset.selectors.to_css_string(),
            "dropping empty ruleset"
          );
          continue;
        }
        let key = ruleset.selectors.to_css_string();
        let existing_ruleset = entries
          .get_index_of(&key)
          .filter(|index| matches!(entries[*index], Rule::Ruleset(_)));
        match existing_ruleset {
          Some(index) if !has_intervening_conflict(&entries, index) => {
            let Rule::Ruleset(existing) = entries[index].clone() else {
              unreachable!();
            };
            entries[index] = Rule::Ruleset(merge_ruleset_pair(existing, ruleset));
          }
          Some(_) => {
            // Collapsing would hoist this ruleset above a conflicting
            // declaration that was emitted later; keep it separate.
            let mut synthetic_key;
            loop {
              synthetic_seq += 1;
              synthetic_key = format!("{key}~{synthetic_seq}");
              if !entries.contains_key(&synthetic_key) {
                break;
              }
            }
            tracing::debug!(selector = %key, "cascade conflict, keeping ruleset separate");
            entries.insert(synthetic_key, Rule::Ruleset(ruleset));
          }
          None => {
            entries.insert(key, Rule::Ruleset(ruleset));
          }
        }
      }
      Rule::Media(media) => {
        // Rulesets inside a block always merge among themselves.
        let media = Media {
          rulesets: merge_rulesets(media.rulesets),
          ..media
        };
        if media.rulesets.is_empty() && media.pages.is_empty() {
          continue;
        }
        if merge_media {
          let key = format!("@media {}", media.queries.join(","));
          match entries.get_index_of(&key) {
            Some(index) => {
              let Rule::Media(existing) = entries[index].clone() else {
                unreachable!();
              };
              let mut rulesets = existing.rulesets;
              rulesets.extend(media.rulesets);
              let mut pages = existing.pages;
              pages.extend(media.pages);
              entries[index] = Rule::Media(Media {
                queries: existing.queries,
                rulesets: merge_rulesets(rulesets),
                pages,
              });
            }
            None => {
              entries.insert(key, Rule::Media(media));
            }
          }
        } else {
          let rule = Rule::Media(media);
          entries.insert(rule.to_css_string(), rule);
        }
      }
      other => {
        // @page and remaining rule types: identical printed form means the
        // later rule wins wholesale.
        entries.insert(other.to_css_string(), other);
      }
    }
  }

  entries.into_values().collect()
}

fn merge_rulesets(rulesets: Vec<Ruleset>) -> Vec<Ruleset> {
  merge_rules(rulesets.into_iter().map(Rule::Ruleset).collect(), false)
    .into_iter()
    .filter_map(|rule| match rule {
      Rule::Ruleset(ruleset) => Some(ruleset),
      _ => None,
    })
    .collect()
}

/// True when a ruleset emitted after `index` declares one of the entry's
/// properties with a different value. Collapsing into the entry would then
/// move the newcomer in front of that declaration and flip the cascade.
fn has_intervening_conflict(entries: &IndexMap<String, Rule>, index: usize) -> bool {
  let Rule::Ruleset(existing) = &entries[index] else {
    return false;
  };
  let mut intervening: HashMap<String, String> = HashMap::new();
  for (_, rule) in entries.iter().skip(index + 1) {
    if let Rule::Ruleset(later) = rule {
      for declaration in &later.declarations {
        intervening.insert(declaration.merge_key(), declaration_value_text(declaration));
      }
    }
  }
  existing.declarations.iter().any(|declaration| {
    intervening
      .get(&declaration.merge_key())
      .is_some_and(|value| *value != declaration_value_text(declaration))
  })
}

fn declaration_value_text(declaration: &Declaration) -> String {
  let mut text = declaration.value.to_css_string();
  if declaration.important {
    text.push_str("!important");
  }
  text
}

fn merge_ruleset_pair(existing: Ruleset, incoming: Ruleset) -> Ruleset {
  let mut merged = unique_declarations(existing.declarations);
  for declaration in incoming.declarations {
    insert_declaration(&mut merged, declaration);
  }
  let mut important_comments = existing.important_comments;
  important_comments.extend(incoming.important_comments);
  Ruleset {
    selectors: existing.selectors,
    declarations: merged.into_values().collect(),
    important_comments,
  }
}

fn unique_declarations(declarations: Vec<Declaration>) -> IndexMap<String, Declaration> {
  let mut unique = IndexMap::new();
  for declaration in declarations {
    insert_declaration(&mut unique, declaration);
  }
  unique
}

fn insert_declaration(unique: &mut IndexMap<String, Declaration>, declaration: Declaration) {
  let key = declaration.merge_key();
  if let Some(existing) = unique.get(&key) {
    // `!important` is never overridden by a plain declaration.
    if existing.important && !declaration.important {
      return;
    }
  }
  unique.insert(key, declaration);
}
