use lessonmark::{Parser, SectionDocument};
use serde::Serialize;

use crate::Generated;
use crate::config::{Config, Titles};
use crate::error::{GenerateError, Result};
use crate::sources::SourceFiles;

/// One module record of the sections artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WowModule {
    pub module_key: String,
    pub cluster: String,
    pub titles: Titles,
    pub sections: SectionDocument,
}

/// Parse every configured module document, in config order.
/// The first failing module aborts the whole run.
pub fn generate_wow(config: &Config, sources: &mut SourceFiles) -> Result<Generated<Vec<WowModule>>> {
    let wow = config.wow()?;
    let mut modules = Vec::with_capacity(wow.modules.len());
    let mut warnings = Vec::new();

    for module in &wow.modules {
        let path = config.resolve(&wow.module_source(&module.key));
        let (file_id, source) = sources.load(&module.key, &path)?;
        let parsed = Parser::new(source, file_id)
            .parse_sections()
            .map_err(|errors| GenerateError::Parse {
                path: path.clone(),
                errors,
            })?;
        warnings.extend(parsed.warnings);
        tracing::debug!(module = %module.key, "parsed section module");

        modules.push(WowModule {
            module_key: module.key.clone(),
            cluster: module.cluster.clone(),
            titles: module.titles.clone(),
            sections: parsed.value,
        });
    }

    Ok(Generated {
        value: modules,
        warnings,
    })
}
