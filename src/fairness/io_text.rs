// Documents whose text was extracted beforehand.

use snafu::ResultExt;
use std::fs;
use std::path::Path;

use crate::fairness::{DfResult, OpeningTextSnafu};

pub fn read_text(path: &Path) -> DfResult<String> {
    fs::read_to_string(path).context(OpeningTextSnafu {
        path: path.display().to_string(),
    })
}
