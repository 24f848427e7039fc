//! CommonJS `require` for modules on the local filesystem.
//!
//! Resolution and file access live on the host side in [`ModuleLoader`]; the
//! embedded side keeps the exports cache and runs each module body inside the
//! usual `(exports, require, module, __filename, __dirname)` wrapper. A module
//! is cached before its body runs, so a cyclic `require` sees the exports
//! populated so far.

use bridge::{BridgeResult, Context};
use core_types::{Callable, HostError, HostValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const RESOLVE_GLOBAL: &str = "__host_require_resolve";
const LOAD_GLOBAL: &str = "__host_require_load";
const SETTLE_GLOBAL: &str = "__host_require_settle";

const REQUIRE_SHIM: &str = r#"
(function () {
    var resolve = __host_require_resolve;
    var load = __host_require_load;
    var settle = __host_require_settle;
    var cache = Object.create(null);

    function dirname(filename) {
        var cut = Math.max(filename.lastIndexOf('/'), filename.lastIndexOf('\\'));
        return cut < 0 ? '.' : filename.slice(0, cut);
    }

    function makeRequire(parent) {
        return function require(specifier) {
            var filename = resolve(parent, String(specifier));
            var cached = cache[filename];
            if (cached) {
                return cached.exports;
            }
            var module = { exports: {}, filename: filename, loaded: false };
            cache[filename] = module;
            try {
                var body = new Function(
                    'exports', 'require', 'module', '__filename', '__dirname',
                    load(filename)
                );
                body.call(module.exports, module.exports, makeRequire(filename),
                    module, filename, dirname(filename));
            } catch (e) {
                delete cache[filename];
                settle(filename, false);
                throw e;
            }
            module.loaded = true;
            settle(filename, true);
            return module.exports;
        };
    }

    globalThis.require = makeRequire(null);
})();
"#;

/// The loading state of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Source handed out, body still running
    Loading,
    /// Body finished without throwing
    Loaded,
}

/// Host half of `require`: resolves specifiers and reads module sources.
#[derive(Debug)]
pub struct ModuleLoader {
    base_dir: PathBuf,
    modules: RefCell<HashMap<PathBuf, ModuleStatus>>,
}

impl ModuleLoader {
    /// Create a loader resolving top-level specifiers against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            modules: RefCell::new(HashMap::new()),
        }
    }

    /// Directory top-level specifiers are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `specifier` relative to the directory of `parent`, or to the
    /// base directory for a top-level `require`.
    ///
    /// Candidates are tried in order: the path itself, the path with `.js`
    /// appended, then `index.js` inside it.
    ///
    /// # Errors
    /// `Module not found: <specifier>` when no candidate is a file.
    pub fn resolve(&self, parent: Option<&Path>, specifier: &str) -> Result<PathBuf, HostError> {
        let dir = parent
            .and_then(Path::parent)
            .unwrap_or(self.base_dir.as_path());
        let target = dir.join(specifier);

        let candidates = [
            target.clone(),
            PathBuf::from(format!("{}.js", target.display())),
            target.join("index.js"),
        ];
        let found = candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| HostError::new(format!("Module not found: {}", specifier)))?;

        // Canonical paths keep one cache entry per file.
        Ok(std::fs::canonicalize(&found).unwrap_or(found))
    }

    /// Read the source of a resolved module and mark it as loading
    ///
    /// # Errors
    /// Fails if the file cannot be read.
    pub fn load(&self, path: &Path) -> Result<String, HostError> {
        let source = std::fs::read_to_string(path).map_err(|err| {
            HostError::new(format!("Cannot read module {}: {}", path.display(), err))
        })?;
        self.modules
            .borrow_mut()
            .insert(path.to_path_buf(), ModuleStatus::Loading);
        tracing::debug!(path = %path.display(), "loading module");
        Ok(source)
    }

    /// Record the outcome of running a module body
    pub fn settle(&self, path: &Path, ok: bool) {
        let mut modules = self.modules.borrow_mut();
        if ok {
            modules.insert(path.to_path_buf(), ModuleStatus::Loaded);
        } else {
            modules.remove(path);
            tracing::debug!(path = %path.display(), "module failed");
        }
    }

    /// Status of a module, if it was ever loaded
    pub fn status(&self, path: &Path) -> Option<ModuleStatus> {
        self.modules.borrow().get(path).copied()
    }

    /// Paths of all modules that finished loading, sorted
    pub fn loaded_modules(&self) -> Vec<PathBuf> {
        let mut loaded: Vec<PathBuf> = self
            .modules
            .borrow()
            .iter()
            .filter(|(_, status)| **status == ModuleStatus::Loaded)
            .map(|(path, _)| path.clone())
            .collect();
        loaded.sort();
        loaded
    }
}

fn path_arg(args: &[HostValue], index: usize) -> Result<PathBuf, HostError> {
    args.get(index)
        .and_then(HostValue::as_str)
        .map(PathBuf::from)
        .ok_or_else(|| HostError::new(format!("expected a path as argument {}", index)))
}

fn path_text(path: &Path) -> HostValue {
    HostValue::from(path.to_string_lossy().into_owned())
}

/// Define `globalThis.require` on `ctx`, resolving against `base_dir`.
///
/// # Errors
/// Fails if the context was destroyed or the wiring script fails.
pub fn install(ctx: &Context, base_dir: impl Into<PathBuf>) -> BridgeResult<Rc<ModuleLoader>> {
    let loader = Rc::new(ModuleLoader::new(base_dir));

    let resolver = Rc::clone(&loader);
    ctx.bind_global(
        RESOLVE_GLOBAL,
        Callable::named("require.resolve", move |args: &[HostValue]| {
            let parent = args.first().and_then(HostValue::as_str).map(Path::new);
            let specifier = args.get(1).and_then(HostValue::as_str).unwrap_or_default();
            resolver.resolve(parent, specifier).map(|path| path_text(&path))
        }),
    )?;

    let reader = Rc::clone(&loader);
    ctx.bind_global(
        LOAD_GLOBAL,
        Callable::named("require.load", move |args: &[HostValue]| {
            reader.load(&path_arg(args, 0)?).map(HostValue::from)
        }),
    )?;

    let settler = Rc::clone(&loader);
    ctx.bind_global(
        SETTLE_GLOBAL,
        Callable::named("require.settle", move |args: &[HostValue]| {
            let ok = args.get(1).and_then(HostValue::as_bool).unwrap_or(false);
            settler.settle(&path_arg(args, 0)?, ok);
            Ok(HostValue::None)
        }),
    )?;

    ctx.evaluate(REQUIRE_SHIM, "<require>")?;
    ctx.eval(&format!(
        "delete globalThis.{}; delete globalThis.{}; delete globalThis.{};",
        RESOLVE_GLOBAL, LOAD_GLOBAL, SETTLE_GLOBAL
    ))?;

    tracing::debug!(
        runtime = %ctx.runtime_id(),
        base = %loader.base_dir().display(),
        "require installed"
    );
    Ok(loader)
}
