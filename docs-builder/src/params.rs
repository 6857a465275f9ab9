//! Parameter tree builder: nest dotted parameters under their owner.
//!
//! `@param options` followed by `@param options.weekStartsOn` becomes a single
//! top-level `options` with `weekStartsOn` in its `props`. Only one level is
//! built; `options.range.start` lands in `options.props` as `range.start`.

use crate::model::Parameter;
use std::collections::HashMap;

/// Build the parameter tree from a flat list.
///
/// `None` in means `None` out: "no parameter list" stays distinct from an
/// empty one.
pub fn build_tree(params: Option<Vec<Parameter>>) -> Option<Vec<Parameter>> {
    params.map(nest)
}

fn nest(params: Vec<Parameter>) -> Vec<Parameter> {
    // Lookup over the original flat names; parents keep their names, so the
    // index stays valid while children are renamed.
    let index: HashMap<&str, usize> = params
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();

    let parents: Vec<Option<usize>> = params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.is_property {
                return None;
            }
            let (prefix, _) = p.name.split_once('.')?;
            match index.get(prefix) {
                Some(&parent) if parent != i => Some(parent),
                _ => {
                    tracing::warn!(param = %p.name, "no parameter named `{}`, keeping at top level", prefix);
                    None
                }
            }
        })
        .collect();

    let mut slots: Vec<Option<Parameter>> = params.into_iter().map(Some).collect();
    for (i, parent) in parents.iter().enumerate() {
        let Some(parent) = *parent else { continue };
        let Some(mut child) = slots[i].take() else { continue };
        if let Some((_, short)) = child.name.split_once('.') {
            child.name = short.to_string();
        }
        child.is_property = true;
        // Parent names never contain a dot, so the parent slot is never moved.
        if let Some(owner) = slots[parent].as_mut() {
            owner.props.get_or_insert_with(Vec::new).push(child);
        }
    }

    slots
        .into_iter()
        .flatten()
        .filter(|p| !p.is_property)
        .collect()
}
