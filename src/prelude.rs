#![allow(unused_imports)]

pub(crate) use anyhow::{Context as _, Result, anyhow, bail};
pub(crate) use async_trait::async_trait;
pub(crate) use indexmap::IndexMap;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::sync::{Arc, Mutex, RwLock};

pub(crate) use log::{debug, error, info, trace, warn};

pub(crate) use crate::base::entry::{
    Describe, Entry, EntryRef, File, Folder, Function, Link, List, Log, Queue, Shape,
    StringEntry, Subscription,
};
pub(crate) use crate::resolve::{Context, Handle};
pub(crate) use crate::utils::sync::{lock, read_lock, write_lock};
