pub(crate) use crate::util::error::ResultExt;
pub(crate) use anyhow::{bail, Context, Result};
pub(crate) use camino::{Utf8Path, Utf8PathBuf};
pub(crate) use fs_err::tokio as fs;
pub(crate) use itertools::Itertools;
pub(crate) use tracing::{debug, error, info, info_span, instrument, warn, Instrument};
