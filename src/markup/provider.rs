use crate::model::IssueId;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Resolves the `name` part of a `module:name` wiki link into a URL.
pub trait LinkProvider: Send + Sync {
    fn link(&self, name: &str, project: &str) -> Option<String>;

    fn is_link_broken(&self, name: &str, project: &str) -> bool;
}

/// Links built from a URL template with `{project}` and `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct UrlTemplateProvider {
    template: String,
}

impl UrlTemplateProvider {
    pub fn new(template: impl ToString) -> Self {
        Self {
            template: template.to_string(),
        }
    }
}

impl LinkProvider for UrlTemplateProvider {
    fn link(&self, name: &str, project: &str) -> Option<String> {
        Some(
            self.template
                .replace("{project}", project)
                .replace("{name}", name),
        )
    }

    fn is_link_broken(&self, _name: &str, _project: &str) -> bool {
        false
    }
}

/// Issue links; a link to an id that is not loaded is broken.
#[derive(Debug, Clone)]
pub struct IssueLinkProvider {
    urls: UrlTemplateProvider,
    known: HashSet<IssueId>,
}

impl IssueLinkProvider {
    pub fn new(template: impl ToString, known: impl IntoIterator<Item = IssueId>) -> Self {
        Self {
            urls: UrlTemplateProvider::new(template),
            known: known.into_iter().collect(),
        }
    }
}

impl LinkProvider for IssueLinkProvider {
    fn link(&self, name: &str, project: &str) -> Option<String> {
        self.urls.link(name, project)
    }

    fn is_link_broken(&self, name: &str, _project: &str) -> bool {
        match name.parse::<IssueId>() {
            Ok(id) => !self.known.contains(&id),
            Err(_) => true,
        }
    }
}

/// The link providers by module name, plus the project ids a link may name explicitly.
#[derive(Default)]
pub struct LinkProviders {
    providers: IndexMap<String, Box<dyn LinkProvider>>,
    projects: HashSet<String>,
}

impl LinkProviders {
    pub fn new(projects: impl IntoIterator<Item = String>) -> Self {
        Self {
            providers: IndexMap::new(),
            projects: projects.into_iter().collect(),
        }
    }

    pub fn register(&mut self, module: impl ToString, provider: impl LinkProvider + 'static) {
        self.providers
            .insert(module.to_string().to_lowercase(), Box::new(provider));
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Splits `module:name` or `module:project:name` and finds the provider and project.
    /// `wiki` is an alias of `doc`. A project id that is not known keeps `fallback`.
    pub(crate) fn resolve<'a>(
        &self,
        text: &'a str,
        fallback: &'a str,
    ) -> Option<(&dyn LinkProvider, &'a str, &'a str)> {
        let (module, mut name) = text.split_once(':')?;
        let mut module = module.to_lowercase();
        if module == "wiki" {
            module = "doc".to_string();
        }
        let provider = self.providers.get(&module)?;

        let mut project = fallback;
        if let Some((project_id, rest)) = name.split_once(':') {
            if self.projects.contains(project_id) {
                project = project_id;
            }
            name = rest;
        }
        Some((provider.as_ref(), name, project))
    }
}
