//! Path assembly for management-API endpoints.
//!
//! Every path segment that carries an entity or vhost name must be
//! percent-encoded: the default vhost is literally `/` and queue or
//! exchange names may contain any UTF-8.

/// Join segments under the `api/` prefix, percent-encoding each one.
///
/// Literal segments (`queues`, `pause`, `vhost-limits`) contain only
/// characters the encoder passes through, so encoding everything keeps
/// the call sites free of per-segment bookkeeping. `/` becomes `%2F`,
/// which is how the default vhost survives the round trip.
pub fn api_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::from("api");
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(segment.as_ref()));
    }
    path
}
