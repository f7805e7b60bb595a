//! Background load thread.
//!
//! Fetching and preparing a bundle never runs on the frame loop. Requests go
//! over a channel; each finished load is published into a lock-free triple
//! buffer for its [`LoadKind`], so the frame loop only ever sees the most
//! recent completion per kind.

use std::sync::mpsc;

use super::pipeline::prepare_bundle;
use super::source::ModelSource;
use super::{LoadCompletion, LoadKind, LoadRequest};
use crate::error::ViewerError;
use crate::scene::ModelId;

enum ProcessorRequest {
    Load(LoadRequest),
    Shutdown,
}

type CompletionInput = triple_buffer::Input<Option<LoadCompletion>>;
type CompletionOutput = triple_buffer::Output<Option<LoadCompletion>>;

/// Background thread that downloads and prepares model bundles.
pub struct LoadProcessor {
    request_tx: mpsc::Sender<ProcessorRequest>,
    molecule_result: CompletionOutput,
    detail_result: CompletionOutput,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl LoadProcessor {
    /// Spawn the load thread around `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the thread fails to spawn.
    pub fn new(source: Box<dyn ModelSource>) -> Result<Self, ViewerError> {
        let (request_tx, request_rx) = mpsc::channel::<ProcessorRequest>();
        let (molecule_input, molecule_output) = triple_buffer::triple_buffer(&None);
        let (detail_input, detail_output) = triple_buffer::triple_buffer(&None);

        let thread = std::thread::Builder::new()
            .name("load-processor".into())
            .spawn(move || {
                Self::thread_loop(source.as_ref(), &request_rx, molecule_input, detail_input);
            })
            .map_err(ViewerError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            molecule_result: molecule_output,
            detail_result: detail_output,
            thread: Some(thread),
        })
    }

    /// Queue a load (non-blocking send).
    pub fn submit(&self, request: LoadRequest) {
        let _ = self.request_tx.send(ProcessorRequest::Load(request));
    }

    /// Non-blocking check for a finished load of `kind`.
    pub fn try_recv(&mut self, kind: LoadKind) -> Option<LoadCompletion> {
        let output = match kind {
            LoadKind::Molecule => &mut self.molecule_result,
            LoadKind::AtomDetail => &mut self.detail_result,
        };
        let _ = output.update();
        output.output_buffer_mut().take()
    }

    /// Shut down the background thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(ProcessorRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        source: &dyn ModelSource,
        request_rx: &mpsc::Receiver<ProcessorRequest>,
        mut molecule_input: CompletionInput,
        mut detail_input: CompletionInput,
    ) {
        while let Ok(first) = request_rx.recv() {
            let Some(batch) = drain_latest(first, request_rx) else {
                break;
            };
            for request in batch {
                let completion = run(source, request);
                match completion.kind {
                    LoadKind::Molecule => molecule_input.write(Some(completion)),
                    LoadKind::AtomDetail => detail_input.write(Some(completion)),
                }
            }
        }
        log::debug!("load processor stopped");
    }
}

impl Drop for LoadProcessor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collect everything already queued behind `first`, keeping only the
/// newest request per kind (molecule first). `None` means shut down.
fn drain_latest(
    first: ProcessorRequest,
    rx: &mpsc::Receiver<ProcessorRequest>,
) -> Option<Vec<LoadRequest>> {
    let mut molecule = None;
    let mut detail = None;
    let mut next = Some(first);
    while let Some(request) = next {
        match request {
            ProcessorRequest::Shutdown => return None,
            ProcessorRequest::Load(load) => match load.kind {
                LoadKind::Molecule => molecule = Some(load),
                LoadKind::AtomDetail => detail = Some(load),
            },
        }
        next = rx.try_recv().ok();
    }
    Some(molecule.into_iter().chain(detail).collect())
}

fn run(source: &dyn ModelSource, request: LoadRequest) -> LoadCompletion {
    let start = web_time::Instant::now();
    let fetched = match request.kind {
        LoadKind::Molecule => source.fetch_molecule(&request.key),
        LoadKind::AtomDetail => source.fetch_atom_model(&request.key),
    };
    let result = fetched.and_then(|bytes| {
        prepare_bundle(
            &bytes,
            ModelId(request.generation),
            &request.key,
            &request.scene,
        )
    });
    match &result {
        Ok(_) => log::debug!(
            "{} load of {} finished in {:?}",
            request.kind,
            request.key,
            start.elapsed()
        ),
        Err(e) => log::debug!("{} load of {} failed: {e}", request.kind, request.key),
    }
    LoadCompletion {
        kind: request.kind,
        generation: request.generation,
        key: request.key,
        result,
    }
}
