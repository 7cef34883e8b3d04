/// Layer the project config (`project`) over the user config (`user`).
///
/// `[memory]` and `[context]` tables combine key by key, so a project file
/// that only sets `memory.path` keeps the user's retry settings. Any other
/// value from the project layer replaces the user's.
pub(crate) fn merge_toml_values(user: toml::Value, project: toml::Value) -> toml::Value {
    match (user, project) {
        (toml::Value::Table(mut merged), toml::Value::Table(project)) => {
            for (key, value) in project {
                let layered = match merged.remove(&key) {
                    Some(existing) => merge_toml_values(existing, value),
                    None => value,
                };
                merged.insert(key, layered);
            }
            toml::Value::Table(merged)
        }
        (_, project) => project,
    }
}
