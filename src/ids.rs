use uuid::Uuid;

/// Fresh opaque identifier for any stored entity.
///
/// Ids are UUID-shaped strings, but nothing else in the service parses them:
/// they are only ever compared for equality.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
