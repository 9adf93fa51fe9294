use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use super::astar::{GridPos, Pathfinder};

/// Requests accepted by the pathfinding worker.
///
/// Requests are processed strictly in receipt order. `FindPath` always
/// runs to completion; there is no cancellation at this layer, so hosts
/// wanting timeouts drop late results by `id` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PathRequest {
    Init {
        width: i32,
        height: i32,
        walkable: Vec<bool>,
    },
    FindPath {
        id: u64,
        start: GridPos,
        end: GridPos,
    },
    UpdateMap {
        walkable: Vec<bool>,
    },
    UpdateTile {
        x: i32,
        y: i32,
        walkable: bool,
    },
    Shutdown,
}

/// Responses emitted by the pathfinding worker.
///
/// `PathResult.path` of `None` means unreachable, a routine outcome.
/// Hosts correlate results by `id`; response order tracks request order
/// only because the worker is single-threaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PathResponse {
    Initialized,
    PathResult {
        id: u64,
        path: Option<Vec<GridPos>>,
        start: GridPos,
        end: GridPos,
    },
    MapUpdated,
    TileUpdated {
        x: i32,
        y: i32,
        walkable: bool,
    },
    Error {
        message: String,
    },
}

/// Worker-side session state. The pathfinder and its walkability bitmap
/// are owned here exclusively; the host keeps its own copy in sync via
/// `UpdateMap`/`UpdateTile` messages.
struct WorkerSession {
    pathfinder: Option<Pathfinder>,
}

impl WorkerSession {
    fn new() -> Self {
        Self { pathfinder: None }
    }

    fn handle(&mut self, request: PathRequest) -> PathResponse {
        match request {
            PathRequest::Init {
                width,
                height,
                walkable,
            } => {
                if width <= 0 || height <= 0 || walkable.len() != (width * height) as usize {
                    return PathResponse::Error {
                        message: format!(
                            "init: walkable map has {} cells, expected {}x{}",
                            walkable.len(),
                            width,
                            height
                        ),
                    };
                }
                self.pathfinder = Some(Pathfinder::new(width, height, walkable));
                log::debug!("pathfinding worker initialized ({}x{})", width, height);
                PathResponse::Initialized
            }
            PathRequest::FindPath { id, start, end } => match &self.pathfinder {
                Some(pathfinder) => {
                    let path = pathfinder.find_path(start, end);
                    PathResponse::PathResult {
                        id,
                        path,
                        start,
                        end,
                    }
                }
                None => PathResponse::Error {
                    message: format!("findPath {}: worker not initialized", id),
                },
            },
            PathRequest::UpdateMap { walkable } => match &mut self.pathfinder {
                Some(pathfinder) => {
                    let expected = (pathfinder.width() * pathfinder.height()) as usize;
                    if walkable.len() != expected {
                        return PathResponse::Error {
                            message: format!(
                                "updateMap: walkable map has {} cells, expected {}",
                                walkable.len(),
                                expected
                            ),
                        };
                    }
                    pathfinder.set_walkable_map(walkable);
                    PathResponse::MapUpdated
                }
                None => PathResponse::Error {
                    message: "updateMap: worker not initialized".to_string(),
                },
            },
            PathRequest::UpdateTile { x, y, walkable } => match &mut self.pathfinder {
                Some(pathfinder) => {
                    // Out-of-range coordinates are ignored inside update_tile;
                    // the acknowledgement still flows so hosts stay in lockstep
                    pathfinder.update_tile(x, y, walkable);
                    PathResponse::TileUpdated { x, y, walkable }
                }
                None => PathResponse::Error {
                    message: "updateTile: worker not initialized".to_string(),
                },
            },
            // Handled by the worker loop before reaching the session
            PathRequest::Shutdown => PathResponse::Error {
                message: "shutdown is not a session request".to_string(),
            },
        }
    }
}

fn run(requests: Receiver<PathRequest>, responses: Sender<PathResponse>) {
    let mut session = WorkerSession::new();

    for request in requests.iter() {
        if matches!(request, PathRequest::Shutdown) {
            break;
        }
        let response = session.handle(request);
        if responses.send(response).is_err() {
            // Host hung up; nothing left to serve
            break;
        }
    }
    log::debug!("pathfinding worker stopped");
}

/// Host-side handle to a dedicated pathfinding thread.
///
/// Long searches block the worker loop, not the host: subsequent
/// requests queue FIFO behind them. Dropping the handle shuts the
/// worker down and joins the thread.
pub struct PathfindingWorker {
    requests: Sender<PathRequest>,
    responses: Receiver<PathResponse>,
    handle: Option<JoinHandle<()>>,
}

impl PathfindingWorker {
    /// Spawn the worker thread
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("pathfinding-worker".to_string())
            .spawn(move || run(request_rx, response_tx))
            .expect("Failed to spawn pathfinding worker thread");

        Self {
            requests: request_tx,
            responses: response_rx,
            handle: Some(handle),
        }
    }

    /// Queue a request; returns false when the worker is gone
    pub fn send(&self, request: PathRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Queue a path search, correlated by `id`
    pub fn request_path(&self, id: u64, start: GridPos, end: GridPos) -> bool {
        self.send(PathRequest::FindPath { id, start, end })
    }

    /// Block until the next response
    pub fn recv(&self) -> Option<PathResponse> {
        self.responses.recv().ok()
    }

    /// Non-blocking poll for a response
    pub fn poll_result(&self) -> Option<PathResponse> {
        self.responses.try_recv().ok()
    }

    /// Stop the worker and join the thread
    pub fn shutdown(&mut self) {
        let _ = self.requests.send(PathRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PathfindingWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
