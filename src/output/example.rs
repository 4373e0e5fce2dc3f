//! Example sources for exercising the pipeline end to end.

use super::{ensure_parent, validate_path};
use crate::utils::error::OutputError;
use log::info;
use std::path::{Path, PathBuf};

pub const EXAMPLE_C_FILE: &str = "example_extension.c";
pub const EXAMPLE_SETUP_FILE: &str = "setup_extension.py";
pub const EXAMPLE_SCRIPT_FILE: &str = "test_mixed_code.py";

const EXAMPLE_C_SOURCE: &str = r#"#include <Python.h>
#include <math.h>

// Computationally intensive function
static PyObject* compute_intensive(PyObject* self, PyObject* args) {
    int n;
    if (!PyArg_ParseTuple(args, "i", &n)) {
        return NULL;
    }

    double result = 0.0;
    for (int i = 0; i < n; i++) {
        for (int j = 0; j < n; j++) {
            result += sin(i) * cos(j);
        }
    }

    return PyFloat_FromDouble(result);
}

static PyMethodDef module_methods[] = {
    {"compute_intensive", compute_intensive, METH_VARARGS, "Compute intensive function"},
    {NULL, NULL, 0, NULL}
};

static struct PyModuleDef module_definition = {
    PyModuleDef_HEAD_INIT,
    "example_extension",
    "Example C extension module",
    -1,
    module_methods
};

PyMODINIT_FUNC PyInit_example_extension(void) {
    return PyModule_Create(&module_definition);
}
"#;

const EXAMPLE_SETUP_SOURCE: &str = r#"from setuptools import setup, Extension

module = Extension('example_extension',
                   sources=['example_extension.c'],
                   extra_compile_args=['-g', '-O2'])

setup(
    name='example_extension',
    ext_modules=[module]
)
"#;

const EXAMPLE_SCRIPT_SOURCE: &str = r#"import json
import time


def python_function(n):
    result = 0
    for i in range(n):
        result += i ** 2
    return result


def json_function(data):
    return json.loads(json.dumps(data))


def native_function(n):
    try:
        import example_extension
    except ImportError:
        return python_function(n)
    return example_extension.compute_intensive(n)


def main():
    for _ in range(100):
        python_function(1000)

    data = {"key": list(range(1000))}
    for _ in range(100):
        json_function(data)

    native_function(300)


if __name__ == "__main__":
    main()
"#;

/// Write the example extension, its build script and a driver script
///
/// **Public** - backs the `--create-example` flag
///
/// # Returns
/// Paths of the written files, in the order C source, setup script, driver
pub fn create_example(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, OutputError> {
    let dir = dir.as_ref();
    let files = [
        (EXAMPLE_C_FILE, EXAMPLE_C_SOURCE),
        (EXAMPLE_SETUP_FILE, EXAMPLE_SETUP_SOURCE),
        (EXAMPLE_SCRIPT_FILE, EXAMPLE_SCRIPT_SOURCE),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        validate_path(&path)?;
        ensure_parent(&path)?;
        std::fs::write(&path, contents)?;
        info!("Created {}", path.display());
        written.push(path);
    }

    Ok(written)
}
