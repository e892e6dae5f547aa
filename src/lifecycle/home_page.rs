use crate::config::AppConfig;
use crate::framework::{
    AggregateStatus, Aggregator, FetchActor, Fetcher, FrameworkError, ResourceClient,
    ResourceData, ResourceProps, Transform,
};
use crate::model::{
    first_or_none, group_skills, AboutMe, AccountSettings, Experience, Project, SkillGroups,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

pub const ACCOUNT_SETTINGS_PATH: &str = "/api/AccountSettings/";
pub const ABOUT_ME_PATH: &str = "/api/AboutMe";
pub const EXPERIENCES_PATH: &str = "/api/Experiences";
pub const PROJECTS_PATH: &str = "/api/Projects";
pub const SKILLS_PATH: &str = "/api/Skills";

const RESOURCE_BUFFER: usize = 16;

/// Everything the page renders once all sources have loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioContent {
    pub account: Option<AccountSettings>,
    pub about: Option<AboutMe>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: SkillGroups,
}

impl PortfolioContent {
    pub fn typewriter_words(&self) -> Vec<String> {
        self.account.clone().unwrap_or_default().typewriter_words()
    }
}

/// What the page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    Error(String),
    Ready(PortfolioContent),
}

/// One mounted resource plus the props it was rendered with.
struct Section<T: ResourceData> {
    client: ResourceClient<T>,
    props: ResourceProps<T>,
}

impl<T: ResourceData> Section<T> {
    fn mount(
        fetcher: &Arc<dyn Fetcher>,
        props: ResourceProps<T>,
        handles: &mut Vec<JoinHandle<()>>,
    ) -> Self {
        let (actor, client) = FetchActor::new(props.clone(), RESOURCE_BUFFER);
        handles.push(tokio::spawn(actor.run(Arc::clone(fetcher))));
        Self { client, props }
    }

    async fn rerender(&self) -> Result<(), FrameworkError> {
        self.client.render(self.props.clone()).await
    }

    fn data(&self) -> Option<T> {
        self.client.state().data
    }
}

/// The portfolio home page: five independent resources gated as one.
///
/// Transforms are built once at mount and reused on every re-render, so
/// re-rendering never refetches.
pub struct HomePage {
    account: Section<Option<AccountSettings>>,
    about: Section<Option<AboutMe>>,
    experiences: Section<Vec<Experience>>,
    projects: Section<Vec<Project>>,
    skills: Section<SkillGroups>,
    handles: Vec<JoinHandle<()>>,
}

impl HomePage {
    /// Spawns one resource actor per backend source. All requests start right away.
    #[instrument(skip_all, fields(api_base = %config.api_base()))]
    pub fn mount(config: &AppConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let mut handles = Vec::with_capacity(5);

        let account = Section::mount(
            &fetcher,
            ResourceProps::new(config.endpoint(ACCOUNT_SETTINGS_PATH))
                .transform(Transform::new(first_or_none::<AccountSettings>)),
            &mut handles,
        );
        let about = Section::mount(
            &fetcher,
            ResourceProps::new(config.endpoint(ABOUT_ME_PATH))
                .transform(Transform::new(first_or_none::<AboutMe>)),
            &mut handles,
        );
        let experiences = Section::mount(
            &fetcher,
            ResourceProps::new(config.endpoint(EXPERIENCES_PATH)),
            &mut handles,
        );
        let projects = Section::mount(
            &fetcher,
            ResourceProps::new(config.endpoint(PROJECTS_PATH)),
            &mut handles,
        );
        let skills = Section::mount(
            &fetcher,
            ResourceProps::new(config.endpoint(SKILLS_PATH)).transform(Transform::new(group_skills)),
            &mut handles,
        );

        info!(resources = handles.len(), "Home page mounted");
        Self {
            account,
            about,
            experiences,
            projects,
            skills,
            handles,
        }
    }

    /// Declaration order decides which error the page shows.
    pub fn aggregate(&self) -> Aggregator {
        Aggregator::new()
            .with_member("accountSettings", self.account.client.watch())
            .with_member("aboutMe", self.about.client.watch())
            .with_member("experiences", self.experiences.client.watch())
            .with_member("projects", self.projects.client.watch())
            .with_member("skills", self.skills.client.watch())
    }

    /// Current view, without waiting.
    pub fn view(&self) -> PageView {
        match self.aggregate().status() {
            AggregateStatus::Loading => PageView::Loading,
            AggregateStatus::Failed(message) => PageView::Error(message),
            AggregateStatus::Ready => PageView::Ready(self.content()),
        }
    }

    /// Waits until nothing is loading, then returns the view.
    pub async fn settled(&self) -> PageView {
        self.aggregate().settled().await;
        self.view()
    }

    /// Re-renders every resource with its mount-time props.
    pub async fn rerender(&self) -> Result<(), FrameworkError> {
        self.account.rerender().await?;
        self.about.rerender().await?;
        self.experiences.rerender().await?;
        self.projects.rerender().await?;
        self.skills.rerender().await?;
        Ok(())
    }

    fn content(&self) -> PortfolioContent {
        PortfolioContent {
            account: self.account.data().flatten(),
            about: self.about.data().flatten(),
            experiences: self.experiences.data().unwrap_or_default(),
            projects: self.projects.data().unwrap_or_default(),
            skills: self.skills.data().unwrap_or_default(),
        }
    }

    /// Tears every resource down and waits for the actors to exit.
    ///
    /// In-flight requests are aborted; nothing they return is applied. Every
    /// actor is torn down and awaited even if one fails; the first failure is
    /// returned.
    pub async fn unmount(self) -> Result<(), FrameworkError> {
        info!("Unmounting home page");
        let teardowns = [
            self.account.client.teardown().await,
            self.about.client.teardown().await,
            self.experiences.client.teardown().await,
            self.projects.client.teardown().await,
            self.skills.client.teardown().await,
        ];
        let mut first_failure = teardowns.into_iter().find_map(Result::err);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Resource task failed: {:?}", e);
                first_failure.get_or_insert(FrameworkError::TaskFailed(e.to_string()));
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                info!("Home page unmounted");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockFetcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_unmount_awaits_every_actor_after_a_failure() {
        let mock = MockFetcher::new();
        let paths = [
            ACCOUNT_SETTINGS_PATH,
            ABOUT_ME_PATH,
            EXPERIENCES_PATH,
            PROJECTS_PATH,
            SKILLS_PATH,
        ];
        for path in paths {
            mock.always_get(format!("http://backend.test{path}")).return_ok(json!([]));
        }
        let config = AppConfig::new("http://backend.test").unwrap();
        let page = HomePage::mount(&config, Arc::new(mock.clone()));
        page.settled().await;

        let skills = page.skills.client.clone();
        page.handles[0].abort();

        assert!(page.unmount().await.is_err());
        assert!(skills.is_closed());
    }
}
