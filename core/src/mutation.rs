//! Caller-side view of the todo list with optimistic updates.
//!
//! # Design
//! `MutationClient` keeps the snapshot a UI should display. A mutation is
//! split into `begin` (build the request, optionally show a projected list
//! right away) and `complete`/`fail` (reconcile once the store answers), so
//! the host can run the round trip however it likes. `mutate` chains the
//! three through a [`Transport`] for hosts that just want to block.
//!
//! Overlapping calls are not coordinated. Whichever authoritative response
//! is completed last decides the visible list.
//!
//! When a call fails, its optimistic projection is reverted to the list shown
//! before it was applied, unless something else has replaced the visible list
//! in the meantime. In that case the newer state is left alone.

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Mutation, Snapshot};

pub type OptimisticUpdate = Box<dyn FnOnce(&Snapshot) -> Snapshot>;

/// Per-call options for [`MutationClient::begin`].
#[derive(Default)]
pub struct MutateOptions {
    optimistic_update: Option<OptimisticUpdate>,
    replace: bool,
}

impl MutateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `update(current)` immediately, before the store responds.
    pub fn optimistic_update(mut self, update: impl FnOnce(&Snapshot) -> Snapshot + 'static) -> Self {
        self.optimistic_update = Some(Box::new(update));
        self
    }

    /// Replace the visible list with the store's response when it arrives.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// What `complete` did with an authoritative response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Replaced,
    Ignored,
}

/// A mutation whose request has been built but whose response has not been
/// reconciled yet.
///
/// Every pending call must end in [`MutationClient::complete`] or
/// [`MutationClient::fail`]; dropping one leaves `is_mutating()` stuck on
/// `true` and its optimistic projection on screen.
#[derive(Debug)]
#[must_use = "resolve with `complete` or `fail`, or the client stays mutating"]
pub struct PendingMutation {
    operation: &'static str,
    request: HttpRequest,
    replace: bool,
    rollback: Option<Rollback>,
}

impl PendingMutation {
    /// The request the host must execute.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

#[derive(Debug)]
struct Rollback {
    /// Version of the visible list right after the projection was applied.
    version: u64,
    /// Version of `previous`, restored along with it.
    previous_version: u64,
    previous: Snapshot,
}

pub struct MutationClient {
    client: TodoClient,
    data: Snapshot,
    // Bumped on every change to `data`.
    version: u64,
    in_flight: usize,
}

impl MutationClient {
    pub fn new(client: TodoClient, initial: Snapshot) -> Self {
        Self {
            client,
            data: initial,
            version: 0,
            in_flight: 0,
        }
    }

    /// The list the caller should currently display.
    pub fn data(&self) -> &Snapshot {
        &self.data
    }

    /// Whether any call is still waiting for its response.
    pub fn is_mutating(&self) -> bool {
        self.in_flight > 0
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn begin(&mut self, mutation: &Mutation, options: MutateOptions) -> Result<PendingMutation, ApiError> {
        let request = self.client.build_mutation(mutation)?;

        let rollback = options.optimistic_update.map(|update| {
            let projected = update(&self.data);
            let previous_version = self.version;
            let previous = self.set(projected);
            Rollback {
                version: self.version,
                previous_version,
                previous,
            }
        });
        self.in_flight += 1;
        debug!(
            operation = mutation.name(),
            optimistic = rollback.is_some(),
            replace = options.replace,
            "mutation issued"
        );

        Ok(PendingMutation {
            operation: mutation.name(),
            request,
            replace: options.replace,
            rollback,
        })
    }

    /// Reconcile a pending call with the response the host received for it.
    ///
    /// A response that is not a usable snapshot counts as a failure and goes
    /// through the same path as [`fail`](Self::fail).
    pub fn complete(&mut self, pending: PendingMutation, response: HttpResponse) -> Result<Resolution, ApiError> {
        let snapshot = match self.client.parse_snapshot(response) {
            Ok(snapshot) => snapshot,
            Err(err) => return Err(self.fail(pending, err)),
        };
        self.in_flight = self.in_flight.saturating_sub(1);

        if pending.replace {
            self.set(snapshot);
            debug!(operation = pending.operation, "mutation resolved, list replaced");
            Ok(Resolution::Replaced)
        } else {
            debug!(operation = pending.operation, "mutation resolved, response ignored");
            Ok(Resolution::Ignored)
        }
    }

    /// Abandon a pending call that produced no usable response.
    pub fn fail(&mut self, pending: PendingMutation, error: ApiError) -> ApiError {
        self.in_flight = self.in_flight.saturating_sub(1);
        warn!(operation = pending.operation, error = %error, "mutation failed");

        if let Some(rollback) = pending.rollback {
            if rollback.version == self.version {
                // Restoring the old version lets an earlier projection that is
                // visible again pass this same check when its call fails.
                self.data = rollback.previous;
                self.version = rollback.previous_version;
                debug!(operation = pending.operation, "optimistic update reverted");
            } else {
                debug!(operation = pending.operation, "optimistic update superseded, not reverting");
            }
        }
        error
    }

    /// Run one mutation to completion through `transport`.
    pub fn mutate<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        mutation: &Mutation,
        options: MutateOptions,
    ) -> Result<Resolution, ApiError> {
        let pending = self.begin(mutation, options)?;
        match transport.execute(pending.request()) {
            Ok(response) => self.complete(pending, response),
            Err(err) => Err(self.fail(pending, err)),
        }
    }

    /// Replace the visible list with a fresh read from the store.
    pub fn refresh<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), ApiError> {
        let response = transport.execute(&self.client.build_read())?;
        let snapshot = self.client.parse_snapshot(response)?;
        self.set(snapshot);
        Ok(())
    }

    fn set(&mut self, snapshot: Snapshot) -> Snapshot {
        self.version += 1;
        std::mem::replace(&mut self.data, snapshot)
    }
}
