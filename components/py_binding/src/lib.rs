//! Python extension module `_quickjs`.
//!
//! Exposes [`bridge::Context`] to Python as `_quickjs.Context`. Python values
//! are translated to host values on the way in and back on the way out;
//! Python callables are kept alive by the embedded heap and invoked with the
//! GIL held.

#![warn(missing_docs)]
#![warn(clippy::all)]

use bridge::{BridgeConfig, BridgeError, Context};
use builtins::console::{self, ConsoleWriter, Stream};
use builtins::require::{self, ModuleLoader};
use core_types::{Callable, HostCallable, HostError, HostObject, HostValue};
use num_bigint::BigInt;
use pyo3::exceptions::{PyMemoryError, PyRuntimeError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyFloat, PyList, PyLong, PyString, PyTuple};
use std::path::PathBuf;
use std::rc::Rc;

/// Host label used in translated Python exceptions.
const PYTHON_LABEL: &str = "Python";

/// A QuickJS context driven from Python.
#[pyclass(name = "Context", module = "_quickjs", unsendable)]
struct PyContext {
    inner: Context,
    modules: Option<Rc<ModuleLoader>>,
}

#[pymethods]
impl PyContext {
    #[new]
    #[pyo3(signature = (with_console = true, memory_limit = None, max_stack_size = None))]
    fn new(
        with_console: bool,
        memory_limit: Option<usize>,
        max_stack_size: Option<usize>,
    ) -> PyResult<Self> {
        let mut config = BridgeConfig::default().with_host_label(PYTHON_LABEL);
        if let Some(limit) = memory_limit {
            config = config.with_memory_limit(limit);
        }
        if let Some(size) = max_stack_size {
            config = config.with_max_stack_size(size);
        }

        let inner = Context::with_config(config).map_err(to_py_err)?;
        if with_console {
            console::install(&inner, Rc::new(PythonConsole)).map_err(to_py_err)?;
        }
        Ok(Self {
            inner,
            modules: None,
        })
    }

    /// Evaluate JavaScript code and return the completion value.
    #[pyo3(signature = (code, filename = String::from(bridge::DEFAULT_FILENAME)))]
    fn eval(&self, py: Python<'_>, code: String, filename: String) -> PyResult<PyObject> {
        let value = self.inner.evaluate(&code, &filename).map_err(to_py_err)?;
        Ok(host_to_py(py, &value))
    }

    /// Evaluate a UTF-8 JavaScript file under its own path.
    fn eval_file(&self, py: Python<'_>, path: PathBuf) -> PyResult<PyObject> {
        let value = self.inner.eval_file(path).map_err(to_py_err)?;
        Ok(host_to_py(py, &value))
    }

    /// Set a global variable in the JavaScript context.
    fn set(&self, name: String, value: &Bound<'_, PyAny>) -> PyResult<()> {
        let value = py_to_host(value)?;
        self.inner.bind_global(&name, value).map_err(to_py_err)
    }

    /// Define `require` resolving CommonJS modules against `base_dir`.
    fn enable_require(&mut self, base_dir: PathBuf) -> PyResult<()> {
        let loader = require::install(&self.inner, base_dir).map_err(to_py_err)?;
        self.modules = Some(loader);
        Ok(())
    }

    /// Paths of the CommonJS modules loaded so far.
    fn loaded_modules(&self) -> Vec<PathBuf> {
        self.modules
            .as_ref()
            .map(|loader| loader.loaded_modules())
            .unwrap_or_default()
    }

    /// Run the embedded garbage collector.
    fn collect_garbage(&self) -> PyResult<()> {
        self.inner.collect_garbage().map_err(to_py_err)
    }

    /// Number of Python objects still referenced from JavaScript.
    #[getter]
    fn live_foreign_objects(&self) -> usize {
        self.inner.live_foreign_objects()
    }

    /// Release the runtime and every Python object it references.
    fn close(&mut self) {
        self.modules = None;
        self.inner.destroy();
    }
}

/// A Python callable invoked from JavaScript.
struct PyCallable {
    function: Py<PyAny>,
    name: String,
}

impl HostCallable for PyCallable {
    fn call(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        Python::with_gil(|py| {
            let args: Vec<PyObject> = args.iter().map(|arg| host_to_py(py, arg)).collect();
            let result = self
                .function
                .bind(py)
                .call1(PyTuple::new_bound(py, args))
                .map_err(|err| exception_text(py, &err))?;
            py_to_host(&result).map_err(|err| exception_text(py, &err))
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Any other Python object, passed by its `str()`.
struct PyObjectRef {
    object: Py<PyAny>,
    type_name: String,
}

impl HostObject for PyObjectRef {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn to_text(&self) -> Result<String, HostError> {
        Python::with_gil(|py| {
            self.object
                .bind(py)
                .str()
                .map(|text| text.to_string())
                .map_err(|err| exception_text(py, &err))
        })
    }
}

/// Console writer going through `sys.stdout` / `sys.stderr`.
struct PythonConsole;

impl ConsoleWriter for PythonConsole {
    fn write_line(&self, stream: Stream, line: &str) -> Result<(), HostError> {
        let target = match stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        };
        Python::with_gil(|py| {
            py.import_bound("sys")
                .and_then(|sys| sys.getattr(target))
                .and_then(|file| file.call_method1("write", (format!("{}\n", line),)))
                .map(|_| ())
                .map_err(|err| exception_text(py, &err))
        })
    }
}

fn exception_text(py: Python<'_>, err: &PyErr) -> HostError {
    HostError::new(err.value_bound(py).to_string())
}

fn attribute_text(object: &Bound<'_, PyAny>, name: &str) -> Option<String> {
    object.getattr(name).ok()?.extract::<String>().ok()
}

/// Python to host. `bool` is checked before `int`, since it subclasses it.
fn py_to_host(object: &Bound<'_, PyAny>) -> PyResult<HostValue> {
    if object.is_none() {
        return Ok(HostValue::None);
    }
    if let Ok(flag) = object.downcast::<PyBool>() {
        return Ok(HostValue::Bool(flag.is_true()));
    }
    if object.is_instance_of::<PyLong>() {
        return Ok(HostValue::Int(object.extract::<BigInt>()?));
    }
    if object.is_instance_of::<PyFloat>() {
        return Ok(HostValue::Float(object.extract::<f64>()?));
    }
    if object.is_instance_of::<PyString>() {
        return Ok(HostValue::Str(object.extract::<String>()?));
    }
    if object.is_callable() {
        let name = attribute_text(object, "__name__").unwrap_or_else(|| "<callable>".to_string());
        return Ok(HostValue::Callable(Callable::new(PyCallable {
            function: object.clone().unbind(),
            name,
        })));
    }

    let type_name = attribute_text(object.get_type().as_any(), "__name__")
        .unwrap_or_else(|| "object".to_string());
    Ok(HostValue::Object(Rc::new(PyObjectRef {
        object: object.clone().unbind(),
        type_name,
    })))
}

/// Host to Python. Values read back from JavaScript are always primitives;
/// the remaining variants fall back to their textual form.
fn host_to_py(py: Python<'_>, value: &HostValue) -> PyObject {
    match value {
        HostValue::None => py.None(),
        HostValue::Bool(flag) => flag.to_object(py),
        HostValue::Int(n) => n.to_object(py),
        HostValue::Float(n) => n.to_object(py),
        HostValue::Str(text) => text.to_object(py),
        HostValue::List(items) => {
            let items: Vec<PyObject> = items.iter().map(|item| host_to_py(py, item)).collect();
            PyList::new_bound(py, items).into_any().unbind()
        }
        HostValue::Callable(_) | HostValue::Object(_) => value
            .to_text()
            .unwrap_or_else(|_| value.to_string())
            .to_object(py),
    }
}

fn to_py_err(err: BridgeError) -> PyErr {
    tracing::debug!(%err, "raising into Python");
    match err {
        BridgeError::OutOfMemory => PyMemoryError::new_err(err.to_string()),
        BridgeError::Io(io) => PyErr::from(io),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// QuickJS contexts for Python.
#[pymodule]
fn _quickjs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyContext>()?;
    m.add("DEFAULT_FILENAME", bridge::DEFAULT_FILENAME)?;
    Ok(())
}
