//! Model lifecycle for the paint session
//!
//! A loaded model bundles the mesh, its spatial index, the color buffer and
//! the undo history. The bundle is replaced as a whole when a new model
//! loads, so a stale history can never be replayed against another mesh.

use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::color_store::{ColorHistoryRecord, ColorStore, RecentColors};
use crate::history::History;
use crate::mesh::{Mesh, MeshError};
use crate::spatial::{IndexError, SpatialIndex};

use super::{PaintSession, SessionEvent};

/// Why a model could not be loaded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),
    #[error("Spatial index build failed: {0}")]
    Index(#[from] IndexError),
}

/// Readiness of the spatial index for the loaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// No model is loaded
    NoModel,
    /// The index is still being built on a worker thread
    Building,
    /// Painting is enabled
    Ready,
    /// The build failed; painting stays disabled for this model
    Failed,
}

pub(crate) enum IndexSlot {
    Ready(SpatialIndex),
    Building(oneshot::Receiver<Result<SpatialIndex, IndexError>>),
    Failed,
}

pub(crate) struct LoadedModel {
    pub(crate) mesh: Arc<Mesh>,
    pub(crate) index: IndexSlot,
    pub(crate) colors: ColorStore,
    pub(crate) history: History,
}

impl IndexSlot {
    pub(crate) fn ready(&self) -> Option<&SpatialIndex> {
        match self {
            IndexSlot::Ready(index) => Some(index),
            _ => None,
        }
    }
}

impl LoadedModel {
    pub(crate) fn status(&self) -> IndexStatus {
        match self.index {
            IndexSlot::Ready(_) => IndexStatus::Ready,
            IndexSlot::Building(_) => IndexStatus::Building,
            IndexSlot::Failed => IndexStatus::Failed,
        }
    }

    /// Pick up a finished background build. Returns the point count when
    /// the index became ready during this call.
    pub(crate) fn poll_index(&mut self) -> Option<usize> {
        let IndexSlot::Building(receiver) = &mut self.index else {
            return None;
        };

        match receiver.try_recv() {
            Ok(Ok(index)) => {
                let count = index.len();
                info!("Spatial index ready ({} points)", count);
                self.index = IndexSlot::Ready(index);
                Some(count)
            }
            Ok(Err(err)) => {
                warn!("Background index build failed: {}", err);
                self.index = IndexSlot::Failed;
                None
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                warn!("Background index build ended without a result");
                self.index = IndexSlot::Failed;
                None
            }
        }
    }
}

impl PaintSession {
    /// Load a model, building its spatial index before returning.
    ///
    /// Replaces any previous model together with its history. With a
    /// `record`, the recent-colors palette is restored from it; otherwise the
    /// current palette carries over. On failure the previous model is still
    /// dropped and painting stays disabled until a valid mesh loads.
    pub fn load_model(
        &mut self,
        mesh: Mesh,
        record: Option<&ColorHistoryRecord>,
    ) -> Result<(), LoadError> {
        let recent = self.release_model();

        let index = match SpatialIndex::from_mesh(&mesh) {
            Ok(index) => index,
            Err(err) => {
                warn!("load_model: {}", err);
                self.parked_recent = recent;
                self.emit(SessionEvent::ModelUnloaded);
                return Err(err.into());
            }
        };

        self.install_model(Arc::new(mesh), IndexSlot::Ready(index), recent, record);
        Ok(())
    }

    /// Load a model and build its spatial index on a worker thread.
    ///
    /// Paint calls before the index is ready are no-ops. The session picks up
    /// the finished index on the next pointer event, [`Self::tick`], or
    /// [`Self::poll_index`]. Empty meshes are rejected immediately.
    pub fn load_model_in_background(
        &mut self,
        mesh: Mesh,
        record: Option<&ColorHistoryRecord>,
    ) -> Result<(), LoadError> {
        let recent = self.release_model();

        if mesh.is_empty() {
            warn!("load_model_in_background: {}", IndexError::EmptyMesh);
            self.parked_recent = recent;
            self.emit(SessionEvent::ModelUnloaded);
            return Err(IndexError::EmptyMesh.into());
        }

        let mesh = Arc::new(mesh);
        let (tx, rx) = oneshot::channel();
        let worker_mesh = Arc::clone(&mesh);
        thread::spawn(move || {
            let result = SpatialIndex::from_mesh(&worker_mesh);
            // The receiver is gone if the model was replaced meanwhile
            let _ = tx.send(result);
        });
        debug!("load_model_in_background: index build started ({} vertices)", mesh.len());

        self.install_model(mesh, IndexSlot::Building(rx), recent, record);
        Ok(())
    }

    /// Drop the current model. Painting, undo and redo are disabled until
    /// another model loads. The recent-colors palette is kept.
    pub fn unload_model(&mut self) {
        if self.model.is_none() {
            return;
        }
        self.parked_recent = self.release_model();
        info!("Model unloaded");
        self.emit(SessionEvent::ModelUnloaded);
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Poll a background index build and report readiness
    pub fn poll_index(&mut self) -> IndexStatus {
        let Some(model) = self.model.as_mut() else {
            return IndexStatus::NoModel;
        };
        if let Some(point_count) = model.poll_index() {
            self.emit(SessionEvent::IndexReady { point_count });
        }
        self.index_status()
    }

    /// Readiness of the spatial index, without polling
    pub fn index_status(&self) -> IndexStatus {
        self.model
            .as_ref()
            .map_or(IndexStatus::NoModel, LoadedModel::status)
    }

    /// The loaded mesh
    pub fn mesh(&self) -> Option<&Mesh> {
        self.model.as_ref().map(|m| m.mesh.as_ref())
    }

    /// The loaded model's color buffer
    pub fn colors(&self) -> Option<&ColorStore> {
        self.model.as_ref().map(|m| &m.colors)
    }

    /// Mutable color buffer, for GPU upload bookkeeping (`take_dirty`)
    pub fn colors_mut(&mut self) -> Option<&mut ColorStore> {
        self.model.as_mut().map(|m| &mut m.colors)
    }

    /// Take the current model out, cancelling any open gesture, and return
    /// the recent-colors palette for the next one.
    fn release_model(&mut self) -> RecentColors {
        self.cancel_gesture();
        match self.model.take() {
            Some(model) => model.colors.into_recent(),
            None => std::mem::replace(
                &mut self.parked_recent,
                RecentColors::new(self.config.recent_colors),
            ),
        }
    }

    fn install_model(
        &mut self,
        mesh: Arc<Mesh>,
        index: IndexSlot,
        recent: RecentColors,
        record: Option<&ColorHistoryRecord>,
    ) {
        let mut colors = ColorStore::initialize(&mesh, self.material_color, recent);
        if let Some(record) = record {
            colors.restore_history(record);
        }

        let vertex_count = mesh.len();
        let authored_colors = colors.is_authored();
        info!(
            "Model loaded: {} vertices, authored colors: {}",
            vertex_count, authored_colors
        );

        self.model = Some(LoadedModel {
            mesh,
            index,
            colors,
            history: History::with_max_undo_levels(self.config.max_undo_levels),
        });

        self.emit(SessionEvent::ModelLoaded {
            vertex_count,
            authored_colors,
        });
        self.emit_history_changed();
    }
}
