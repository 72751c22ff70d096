use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use futures_util::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{Map, Value};
use tera::{Context, Template, Tera};
use walkdir::WalkDir;

use super::data::DataContext;
use crate::config::SearchPaths;
use crate::util::{error_chain, is_truthy};

/// Prefix of the temporary template a page is registered under while it
/// renders. Discovered templates are named by relative path and never
/// start with it.
const PAGE_TEMPLATE_PREFIX: &str = "__page__:";

/// Error produced by a template engine. Boxed so custom engines can report
/// their own error types.
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// A pending render. The built-in Tera environment resolves it immediately;
/// other engines may suspend (e.g. while loading templates).
pub type RenderFuture<'a> = BoxFuture<'a, Result<String, EngineError>>;

/// A template engine the pipeline renders through.
pub trait TemplateEngine: Send + Sync {
    /// Render `source` against `context`.
    ///
    /// `name` identifies the template in diagnostics; the pipeline passes the
    /// path of the file being rendered.
    fn render<'a>(
        &'a self,
        name: &'a str,
        source: &'a str,
        context: &'a DataContext,
    ) -> RenderFuture<'a>;
}

/// The template environment, wrapping Tera.
///
/// Holds every template found under the search roots, plus globals and
/// filters registered through the environment hook.
pub struct Environment {
    tera: Mutex<Tera>,
    globals: Context,
    search_paths: Vec<PathBuf>,
    autoescape: bool,
}

impl Environment {
    /// Create an environment loading templates from the given search roots.
    ///
    /// Every regular file is a candidate, named by its `/`-separated path
    /// relative to its root. When several roots hold the same name, the
    /// earliest root wins. Missing roots are skipped, and so are files that
    /// are not UTF-8, fail to parse, or extend or import a template that
    /// could not be loaded.
    pub fn new(
        search_paths: &SearchPaths,
        engine_options: &Map<String, Value>,
    ) -> Result<Self, tera::Error> {
        let roots = search_paths.roots();
        let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
        for root in &roots {
            for (name, path) in discover_templates(root) {
                found.entry(name).or_insert(path);
            }
        }

        let mut loaded: BTreeMap<String, LoadedTemplate> = found
            .into_iter()
            .filter_map(|(name, path)| {
                let template = LoadedTemplate::read(&name, &path)?;
                Some((name, template))
            })
            .collect();
        prune_unresolved(&mut loaded);

        let mut tera = Tera::default();
        tracing::debug!(count = loaded.len(), "loading templates");
        tera.add_raw_templates(
            loaded
                .into_iter()
                .map(|(name, template)| (name, template.source))
                .collect::<Vec<_>>(),
        )?;

        let mut autoescape = true;
        for (key, value) in engine_options {
            match key.as_str() {
                "autoescape" => autoescape = is_truthy(value),
                other => tracing::debug!(option = other, "engine option ignored by tera"),
            }
        }

        let mut environment = Self {
            tera: Mutex::new(tera),
            globals: Context::new(),
            search_paths: roots.iter().map(|p| p.to_path_buf()).collect(),
            autoescape,
        };
        environment.set_autoescape(autoescape);
        Ok(environment)
    }

    /// Turn HTML escaping of expression output on or off for all templates.
    pub fn set_autoescape(&mut self, enabled: bool) {
        self.autoescape = enabled;
        let tera = self.tera_mut();
        if enabled {
            // Every name ends with "".
            tera.autoescape_on(vec![""]);
        } else {
            tera.autoescape_on(vec![]);
        }
    }

    pub fn autoescape(&self) -> bool {
        self.autoescape
    }

    /// Register a filter usable as `{{ value | name }}`.
    pub fn register_filter<F: tera::Filter + 'static>(&mut self, name: &str, filter: F) {
        self.tera_mut().register_filter(name, filter);
    }

    /// Register a function usable as `{{ name(arg=...) }}`.
    pub fn register_function<F: tera::Function + 'static>(&mut self, name: &str, function: F) {
        self.tera_mut().register_function(name, function);
    }

    /// Add a variable visible to every render. File data takes precedence
    /// over globals of the same name.
    pub fn add_global<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.globals.insert(key, value);
    }

    /// Direct access to the underlying Tera instance.
    pub fn tera_mut(&mut self) -> &mut Tera {
        self.tera.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Names of all loaded templates, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let tera = self.tera.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = tera.get_template_names().map(str::to_string).collect();
        names.sort_unstable();
        names
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Render raw template source against a data context.
    ///
    /// The source is registered as a temporary template under a reserved
    /// name, so it can extend or include any loaded template (including
    /// one with the same name as the page), and removed again afterwards.
    pub fn render_str(
        &self,
        name: &str,
        source: &str,
        context: &DataContext,
    ) -> Result<String, tera::Error> {
        let mut tera_context = self.globals.clone();
        tera_context.extend(Context::from_serialize(context)?);

        let page = format!("{PAGE_TEMPLATE_PREFIX}{name}");
        let mut tera = self.tera.lock().unwrap_or_else(PoisonError::into_inner);
        let result = tera
            .add_raw_template(&page, source)
            .and_then(|()| tera.render(&page, &tera_context));

        // Registration can fail after the template was inserted.
        tera.templates.remove(&page);

        result
    }
}

impl TemplateEngine for Environment {
    fn render<'a>(
        &'a self,
        name: &'a str,
        source: &'a str,
        context: &'a DataContext,
    ) -> RenderFuture<'a> {
        let result = self
            .render_str(name, source, context)
            .map_err(|e| Box::new(e) as EngineError);
        future::ready(result).boxed()
    }
}

/// A template file that parsed, with the names it depends on at load time.
struct LoadedTemplate {
    source: String,
    parent: Option<String>,
    imports: Vec<String>,
}

impl LoadedTemplate {
    fn read(name: &str, path: &Path) -> Option<Self> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::debug!(template = name, error = %e, "skipping unreadable file");
                return None;
            }
        };

        match Template::new(name, Some(path.display().to_string()), &source) {
            Ok(template) => Some(Self {
                parent: template.parent,
                imports: template
                    .imported_macro_files
                    .into_iter()
                    .map(|(file, _namespace)| file)
                    .collect(),
                source,
            }),
            Err(e) => {
                tracing::warn!(
                    template = name,
                    error = %error_chain(&e),
                    "skipping template that fails to parse"
                );
                None
            }
        }
    }

    fn dependencies(&self) -> impl Iterator<Item = &String> {
        self.parent.iter().chain(&self.imports)
    }
}

/// Drop templates whose parent or macro imports are missing, repeating
/// until every remaining dependency resolves. Tera rejects the whole set
/// otherwise.
fn prune_unresolved(templates: &mut BTreeMap<String, LoadedTemplate>) {
    loop {
        let broken: Vec<String> = templates
            .iter()
            .filter(|(_, template)| {
                template
                    .dependencies()
                    .any(|dependency| !templates.contains_key(dependency))
            })
            .map(|(name, _)| name.clone())
            .collect();
        if broken.is_empty() {
            return;
        }
        for name in broken {
            tracing::warn!(template = %name, "skipping template with a missing parent or import");
            templates.remove(&name);
        }
    }
}

/// Find every regular file under `root`, keyed by its `/`-separated
/// relative name.
fn discover_templates(root: &Path) -> Vec<(String, PathBuf)> {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "template search path not found, skipping");
        return Vec::new();
    }

    let mut templates = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        templates.push((name, path.to_path_buf()));
    }

    tracing::debug!(root = %root.display(), count = templates.len(), "discovered templates");
    templates
}
