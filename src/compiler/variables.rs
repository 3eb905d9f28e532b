//! Maps internal variable ids to the names the execution engine sees.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::graph::VariableDeclaration;

/// Per-compile name table. Rebuilt at the start of every compile and emptied
/// at the end, so nothing leaks between independently edited graphs.
#[derive(Debug, Default)]
pub struct VariableNames {
    by_id: HashMap<String, String>,
    used: IndexSet<String>,
}

impl VariableNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the table with names for `declarations`, in declaration order.
    pub fn rebuild(&mut self, declarations: &[VariableDeclaration]) {
        self.clear();
        let mut taken = HashSet::new();
        for declaration in declarations {
            let name = distinct_name(&safe_name(&declaration.name), &taken);
            taken.insert(name.clone());
            self.by_id.insert(declaration.id.clone(), name);
        }
    }

    /// Looks up the name for `id` and records it as used.
    pub fn resolve(&mut self, id: &str) -> Option<String> {
        let name = self.by_id.get(id)?.clone();
        self.used.insert(name.clone());
        Some(name)
    }

    /// Names resolved so far, in first-use order. Empties the table.
    pub fn finish(&mut self) -> Vec<String> {
        let used = std::mem::take(&mut self.used).into_iter().collect();
        self.clear();
        used
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.used.clear();
    }
}

/// Turns a user-visible variable name into an identifier.
///
/// Spaces become `_`, everything outside `[A-Za-z0-9_]` is replaced the way a
/// URI escape would spell it (`é` becomes `_C3_A9`), and a leading digit gets
/// a `my_` prefix.
pub fn safe_name(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    let mut safe = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            safe.push(ch);
        } else if ch == ' ' || is_uri_unescaped(ch) {
            safe.push('_');
        } else {
            let mut buffer = [0u8; 4];
            for byte in ch.encode_utf8(&mut buffer).bytes() {
                safe.push_str(&format!("_{:02X}", byte));
            }
        }
    }
    if safe.starts_with(|ch: char| ch.is_ascii_digit()) {
        safe.insert_str(0, "my_");
    }
    safe
}

fn is_uri_unescaped(ch: char) -> bool {
    ";,/?:@&=+$-.!~*'()#".contains(ch)
}

/// `base`, or `base2`, `base3`, ... whichever is free first.
fn distinct_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|suffix| format!("{}{}", base, suffix))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
