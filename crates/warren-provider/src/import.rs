//! Import identifier parsing.
//!
//! Existing broker objects are adopted by identifier. One format per
//! kind:
//!
//! - vhost, user, vhost limits: the bare name
//! - exchange, queue, policy: `name@vhost`
//! - permission: `user@vhost`
//! - shovel, federation upstream, federation upstream set: `vhost@name`
//! - binding: `vhost@source@destination@destination_type@properties_key`
//!
//! `@` is the separator and may not occur inside the parts themselves.

use crate::error::{ProviderError, ProviderResult};

/// Split an id into exactly two `@`-separated, non-empty parts.
pub(crate) fn two_parts<'a>(id: &'a str, expected: &'static str) -> ProviderResult<(&'a str, &'a str)> {
    match parts_of(id, 2, expected)?.as_slice() {
        [first, second] => Ok((first, second)),
        _ => unreachable!("parts_of returned the wrong arity"),
    }
}

/// Split an id into exactly five `@`-separated, non-empty parts.
pub(crate) fn five_parts<'a>(
    id: &'a str,
    expected: &'static str,
) -> ProviderResult<(&'a str, &'a str, &'a str, &'a str, &'a str)> {
    match parts_of(id, 5, expected)?.as_slice() {
        [a, b, c, d, e] => Ok((a, b, c, d, e)),
        _ => unreachable!("parts_of returned the wrong arity"),
    }
}

fn parts_of<'a>(id: &'a str, count: usize, expected: &'static str) -> ProviderResult<Vec<&'a str>> {
    let parts: Vec<&str> = id.split('@').collect();
    if parts.len() != count || parts.iter().any(|part| part.is_empty()) {
        return Err(ProviderError::invalid_import_id(id, expected));
    }
    Ok(parts)
}

/// A bare-name id: non-empty, no separator.
pub(crate) fn bare_name<'a>(id: &'a str, expected: &'static str) -> ProviderResult<&'a str> {
    if id.is_empty() || id.contains('@') {
        return Err(ProviderError::invalid_import_id(id, expected));
    }
    Ok(id)
}
