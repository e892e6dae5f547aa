use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category headings, in display order.
pub const SKILL_CATEGORIES: [&str; 3] = ["Languages", "Frameworks and Technologies", "Developer Tools"];

/// Icon sets a named icon may come from, keyed by its lowercase two-letter prefix.
const ICON_SETS: [&str; 6] = ["fa", "si", "md", "io", "gi", "ai"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub name: Option<String>,
    pub category: Option<String>,
    pub icon_name: Option<String>,
    pub logo_url: Option<String>,
}

/// How a skill is pictured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillIcon<'a> {
    Logo(&'a str),
    Named { set: &'static str, name: &'a str },
    None,
}

impl Skill {
    /// A logo URL takes precedence over a named icon. Named icons outside the
    /// known sets resolve to [`SkillIcon::None`].
    pub fn icon(&self) -> SkillIcon<'_> {
        if let Some(url) = self.logo_url.as_deref().filter(|url| !url.is_empty()) {
            return SkillIcon::Logo(url);
        }
        let Some(name) = self.icon_name.as_deref() else {
            return SkillIcon::None;
        };
        let prefix = name.get(..2).map(str::to_ascii_lowercase);
        match ICON_SETS.iter().find(|set| Some(**set) == prefix.as_deref()) {
            Some(set) => SkillIcon::Named { set: *set, name },
            None => SkillIcon::None,
        }
    }
}

/// Skills bucketed under the three fixed categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroups {
    #[serde(rename = "Languages")]
    pub languages: Vec<Skill>,
    #[serde(rename = "Frameworks and Technologies")]
    pub frameworks: Vec<Skill>,
    #[serde(rename = "Developer Tools")]
    pub tools: Vec<Skill>,
}

impl SkillGroups {
    fn bucket(&mut self, category: &str) -> Option<&mut Vec<Skill>> {
        match category {
            "Languages" => Some(&mut self.languages),
            "Frameworks and Technologies" => Some(&mut self.frameworks),
            "Developer Tools" => Some(&mut self.tools),
            _ => None,
        }
    }

    /// `(category, skills)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[Skill])> {
        SKILL_CATEGORIES
            .into_iter()
            .zip([&self.languages[..], &self.frameworks[..], &self.tools[..]])
    }

    pub fn len(&self) -> usize {
        self.languages.len() + self.frameworks.len() + self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Skill> for SkillGroups {
    /// Skills with an unknown or missing category are dropped.
    fn from_iter<I: IntoIterator<Item = Skill>>(skills: I) -> Self {
        let mut groups = SkillGroups::default();
        for skill in skills {
            let Some(category) = skill.category.clone() else {
                continue;
            };
            if let Some(bucket) = groups.bucket(&category) {
                bucket.push(skill);
            }
        }
        groups
    }
}

/// Groups a raw skills array.
pub fn group_skills(raw: Value) -> Result<SkillGroups, String> {
    let skills: Vec<Skill> = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    Ok(skills.into_iter().collect())
}
