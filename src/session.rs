//! Session - the save / send / delete workflows a front end drives
//!
//! Each workflow is one explicit call composing the store, the command
//! builder, the runner and the formatter. The session owns the only copy of
//! the endpoint collection; it assumes a single writer.

use crate::config::Config;
use crate::curl::{to_curl, CurlCommand};
use crate::error::{Error, Result};
use crate::format::format_response;
use crate::models::{Endpoint, EndpointForm, RawResult};
use crate::runner::{CommandRunner, ProcessRunner};
use crate::storage::{EndpointStore, LoadOutcome};

/// Everything produced by one send
#[derive(Clone, Debug)]
pub struct SendOutcome {
    /// Index of the sent endpoint in the store
    pub index: usize,
    pub endpoint: Endpoint,
    pub result: RawResult,
    /// `result.raw_output` after [`format_response`]
    pub formatted: String,
    /// One-line summary for a status bar
    pub status: String,
}

impl SendOutcome {
    /// The command as run, a blank line, then the formatted output
    pub fn transcript(&self) -> String {
        format!("$ {}\n\n{}", self.result.display_command, self.formatted)
    }
}

pub struct Session<R: CommandRunner = ProcessRunner> {
    store: EndpointStore,
    runner: R,
    client: String,
}

impl Session<ProcessRunner> {
    /// Load the store from the configured data directory
    pub fn open(config: &Config) -> (Self, LoadOutcome) {
        let (store, outcome) = EndpointStore::open(&config.data_dir);
        let session = Session::with_runner(store, ProcessRunner::new(), &config.client_binary);
        (session, outcome)
    }
}

impl<R: CommandRunner> Session<R> {
    pub fn with_runner(store: EndpointStore, runner: R, client: impl Into<String>) -> Self {
        Session {
            store,
            runner,
            client: client.into(),
        }
    }

    pub fn store(&self) -> &EndpointStore {
        &self.store
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    /// Validate the form, upsert and persist. Returns the index to reselect.
    pub fn save(&mut self, form: &EndpointForm) -> Result<usize> {
        let endpoint = form.into_endpoint()?;
        self.save_endpoint(endpoint)
    }

    /// Upsert an already-built endpoint and persist
    pub fn save_endpoint(&mut self, endpoint: Endpoint) -> Result<usize> {
        let index = self.store.upsert(endpoint);
        self.store.persist()?;
        Ok(index)
    }

    /// Save the form, then run it and format the response
    pub fn send(&mut self, form: &EndpointForm) -> Result<SendOutcome> {
        let index = self.save(form)?;
        self.send_at(index)
    }

    /// Run a stored endpoint as-is
    pub fn send_stored(&mut self, name: &str) -> Result<SendOutcome> {
        let index = self
            .store
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        self.send_at(index)
    }

    fn send_at(&mut self, index: usize) -> Result<SendOutcome> {
        let endpoint = self
            .store
            .get(index)
            .cloned()
            .ok_or(Error::OutOfRange {
                index,
                len: self.store.len(),
            })?;

        tracing::info!(name = %endpoint.name, method = %endpoint.method, url = %endpoint.url, "Sending request");
        let command = to_curl(&endpoint, &self.client);
        let result = self.runner.run(&command);
        let formatted = format_response(&result.raw_output);

        let status = if result.success() {
            "Request completed.".to_string()
        } else {
            format!("{} returned code {}.", self.client, result.exit_code)
        };

        Ok(SendOutcome {
            index,
            endpoint,
            result,
            formatted,
            status,
        })
    }

    /// Delete by index and persist
    pub fn delete(&mut self, index: usize) -> Result<Endpoint> {
        let removed = self.store.delete(index)?;
        self.store.persist()?;
        Ok(removed)
    }

    /// Delete by exact name and persist
    pub fn delete_named(&mut self, name: &str) -> Result<Endpoint> {
        let index = self
            .store
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        self.delete(index)
    }

    /// Delete by exact name, falling back to a list index when no name matches
    pub fn delete_target(&mut self, target: &str) -> Result<Endpoint> {
        match (self.store.position(target), target.parse::<usize>()) {
            (Some(index), _) | (None, Ok(index)) => self.delete(index),
            (None, Err(_)) => Err(Error::NotFound(target.to_string())),
        }
    }

    /// Stored endpoint called `name`
    pub fn endpoint(&self, name: &str) -> Result<&Endpoint> {
        self.store
            .find(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// The command that sending `name` would run
    pub fn command_for(&self, name: &str) -> Result<CurlCommand> {
        self.store
            .find(name)
            .map(|endpoint| to_curl(endpoint, &self.client))
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}
