use crate::error::CoreError;
use serde::Serialize;
use std::fmt;

pub const PHONE_KEYWORDS: [&str; 4] = ["TELEFONE", "TEL", "FONE", "CELULAR"];
pub const AREA_CODE_KEYWORDS: [&str; 4] = ["DDD", "CODIGO AREA", "ÁREA", "CODAREA"];
pub const NAME_KEYWORDS: [&str; 1] = ["NOME"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Phone,
    AreaCode,
    Name,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 3] = [ColumnRole::Phone, ColumnRole::AreaCode, ColumnRole::Name];
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnRole::Phone => "phone",
            ColumnRole::AreaCode => "area code",
            ColumnRole::Name => "name",
        };
        f.write_str(label)
    }
}

pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    pub role: ColumnRole,
    keywords: Vec<String>,
}

impl ColumnRule {
    pub fn new<I, S>(role: ColumnRole, keywords: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|keyword| normalize_column_name(keyword.as_ref()))
            .filter(|keyword| !keyword.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(CoreError::EmptyKeywords(role));
        }
        Ok(Self { role, keywords })
    }

    fn matches(&self, normalized_name: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| normalized_name.contains(keyword.as_str()))
    }
}

/// Ordered keyword rules. Earlier rules bind first; a column bound to one
/// role is never offered to a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRules {
    rules: Vec<ColumnRule>,
}

impl Default for ColumnRules {
    fn default() -> Self {
        let rule = |role, keywords: &[&str]| ColumnRule {
            role,
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        };
        Self {
            rules: vec![
                rule(ColumnRole::Phone, &PHONE_KEYWORDS),
                rule(ColumnRole::AreaCode, &AREA_CODE_KEYWORDS),
                rule(ColumnRole::Name, &NAME_KEYWORDS),
            ],
        }
    }
}

impl ColumnRules {
    /// Replaces the keywords of `role`, keeping its priority slot.
    pub fn with_keywords<I, S>(mut self, role: ColumnRole, keywords: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let replacement = ColumnRule::new(role, keywords)?;
        match self.rules.iter_mut().find(|rule| rule.role == role) {
            Some(rule) => *rule = replacement,
            None => self.rules.push(replacement),
        }
        Ok(self)
    }

    pub fn resolve<S: AsRef<str>>(&self, column_names: &[S]) -> ColumnMap {
        let normalized: Vec<String> = column_names
            .iter()
            .map(|name| normalize_column_name(name.as_ref()))
            .collect();
        let mut bound = vec![false; column_names.len()];
        let mut map = ColumnMap::default();
        self.bind_heuristics(column_names, &normalized, &mut bound, &mut map);
        map
    }

    /// Operator-chosen columns win; heuristics fill the remaining roles.
    pub fn resolve_with<S: AsRef<str>>(
        &self,
        column_names: &[S],
        overrides: &ColumnOverrides,
    ) -> Result<ColumnMap, CoreError> {
        let normalized: Vec<String> = column_names
            .iter()
            .map(|name| normalize_column_name(name.as_ref()))
            .collect();
        let mut bound = vec![false; column_names.len()];
        let mut map = ColumnMap::default();

        for role in ColumnRole::ALL {
            let Some(wanted) = overrides.get(role) else {
                continue;
            };
            let index = find_column(column_names, &normalized, wanted)
                .ok_or_else(|| CoreError::UnknownColumn(wanted.to_string()))?;
            if bound[index] {
                return Err(CoreError::ColumnBoundTwice(
                    column_names[index].as_ref().to_string(),
                ));
            }
            bound[index] = true;
            map.set(role, column_names[index].as_ref().to_string());
        }

        self.bind_heuristics(column_names, &normalized, &mut bound, &mut map);
        Ok(map)
    }

    fn bind_heuristics<S: AsRef<str>>(
        &self,
        column_names: &[S],
        normalized: &[String],
        bound: &mut [bool],
        map: &mut ColumnMap,
    ) {
        for rule in &self.rules {
            if map.get(rule.role).is_some() {
                continue;
            }
            let hit = normalized
                .iter()
                .enumerate()
                .find(|(index, name)| !bound[*index] && rule.matches(name));
            if let Some((index, _)) = hit {
                bound[index] = true;
                map.set(rule.role, column_names[index].as_ref().to_string());
            }
        }
    }
}

fn find_column<S: AsRef<str>>(
    column_names: &[S],
    normalized: &[String],
    wanted: &str,
) -> Option<usize> {
    column_names
        .iter()
        .position(|name| name.as_ref() == wanted)
        .or_else(|| {
            let wanted = normalize_column_name(wanted);
            normalized.iter().position(|name| *name == wanted)
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnOverrides {
    pub phone: Option<String>,
    pub area_code: Option<String>,
    pub name: Option<String>,
}

impl ColumnOverrides {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Phone => self.phone.as_deref(),
            ColumnRole::AreaCode => self.area_code.as_deref(),
            ColumnRole::Name => self.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnMap {
    pub phone_column: Option<String>,
    pub area_code_column: Option<String>,
    pub name_column: Option<String>,
}

impl ColumnMap {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Phone => self.phone_column.as_deref(),
            ColumnRole::AreaCode => self.area_code_column.as_deref(),
            ColumnRole::Name => self.name_column.as_deref(),
        }
    }

    fn set(&mut self, role: ColumnRole, column: String) {
        let slot = match role {
            ColumnRole::Phone => &mut self.phone_column,
            ColumnRole::AreaCode => &mut self.area_code_column,
            ColumnRole::Name => &mut self.name_column,
        };
        *slot = Some(column);
    }

    pub fn require_phone(&self) -> Result<&str, CoreError> {
        self.phone_column
            .as_deref()
            .ok_or(CoreError::MissingRequiredColumn(ColumnRole::Phone))
    }

    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .find(|role| self.get(*role) == Some(column))
    }
}
