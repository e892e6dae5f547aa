use serde::{Deserialize, Serialize};

/// One entry of the experience section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub company: Option<String>,
    pub logo: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

/// One card of the projects section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: Option<String>,
    pub description: Option<String>,
    pub github_link: Option<String>,
    pub website_link: Option<String>,
    pub languages_used: Option<String>,
}
