/// Batch asset referencing: apply one URL to prefix-matched siblings
use tracing::{debug, info};

use crate::error::Error;
use crate::scene::{PrimPath, Stage};

/// Default parent searched when the prefix names no parent of its own.
const DEFAULT_PARENT: &str = "/World";

/// Split a target prefix into (parent path, name prefix).
///
/// `/World/Props/Crate` searches `/World/Props` for children named
/// `Crate*`; a bare `Crate` searches `/World`.
fn split_prefix(target_prefix: &str) -> Result<(PrimPath, String), Error> {
    match target_prefix.rfind('/') {
        Some(idx) => {
            let parent = if idx == 0 { "/" } else { &target_prefix[..idx] };
            let name = &target_prefix[idx + 1..];
            if name.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "prefix '{target_prefix}' has no name component"
                )));
            }
            Ok((PrimPath::new(parent)?, name.to_string()))
        }
        None => Ok((PrimPath::new(DEFAULT_PARENT)?, target_prefix.to_string())),
    }
}

/// Replace the reference of every direct child of the prefix's parent whose
/// name starts with the prefix. Returns how many prims were updated; zero
/// matches is a valid outcome, not an error.
pub fn apply_reference_by_prefix(
    stage: Option<&mut Stage>,
    target_prefix: &str,
    asset_url: &str,
) -> Result<usize, Error> {
    let stage = stage.ok_or(Error::MissingDocument)?;

    let target_prefix = target_prefix.trim();
    let asset_url = asset_url.trim();
    if target_prefix.is_empty() {
        return Err(Error::InvalidInput("target prefix is empty".to_string()));
    }
    if asset_url.is_empty() {
        return Err(Error::InvalidInput("asset URL is empty".to_string()));
    }

    let (parent, name_prefix) = split_prefix(target_prefix)?;
    if !parent.is_root() && stage.prim_at(&parent).is_none() {
        return Err(Error::InvalidPath(parent.as_str().to_string()));
    }

    let matches: Vec<PrimPath> = stage
        .children_of(&parent)
        .into_iter()
        .filter(|child| child.name().starts_with(&name_prefix))
        .collect();

    let mut count = 0;
    for child in matches {
        if let Some(prim) = stage.prim_mut(&child) {
            prim.reference = Some(asset_url.to_string());
            debug!(prim = %child, url = asset_url, "applied reference");
            count += 1;
        }
    }

    info!(
        parent = %parent,
        prefix = name_prefix.as_str(),
        updated = count,
        "reference batch complete"
    );
    Ok(count)
}
