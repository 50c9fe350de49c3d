use std::sync::Arc;

use plumbfield_common::ObjectId;

use crate::projection::{EditorObject, PlacementContext, SimulationObject};
use crate::{InstantiateError, LevelDocument, WorldObjectDescriptor};

/// Simulation objects built from a level, plus the objects that were skipped.
#[derive(Debug, Default)]
pub struct Instantiated {
    pub objects: Vec<SimulationObject>,
    /// `(node, error)` for every object that could not be instantiated.
    pub skipped: Vec<(usize, InstantiateError)>,
}

/// Turns descriptors into simulation or editor objects.
///
/// Pure with respect to the descriptor and the injected placement context.
#[derive(Debug, Clone, Default)]
pub struct RuntimeInstantiator {
    context: PlacementContext,
}

impl RuntimeInstantiator {
    pub fn new(context: PlacementContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PlacementContext {
        &self.context
    }

    pub fn to_simulation(
        &self,
        descriptor: &WorldObjectDescriptor,
    ) -> Result<SimulationObject, InstantiateError> {
        let kind = descriptor.kind();
        let projected = kind.to_simulation(&self.context)?;
        Ok(SimulationObject::new(kind.tag(), kind.position(), projected))
    }

    pub fn to_editor(&self, descriptor: &Arc<WorldObjectDescriptor>) -> EditorObject {
        let shape = descriptor.kind().editor_shape();
        EditorObject::new(ObjectId::new(), Arc::clone(descriptor), shape)
    }

    /// Instantiate every object of a level for simulation, in document order.
    pub fn instantiate_level(&self, document: &LevelDocument) -> Instantiated {
        let mut out = Instantiated::default();
        for (node, descriptor) in document.objects.iter().enumerate() {
            match self.to_simulation(descriptor) {
                Ok(object) => out.objects.push(object),
                Err(err) => {
                    tracing::warn!(node, error = %err, "object not instantiated");
                    out.skipped.push((node, err));
                }
            }
        }
        out
    }

    /// Editor objects for every object of a level, in document order.
    pub fn editor_objects(&self, document: &LevelDocument) -> Vec<EditorObject> {
        document.objects.iter().map(|d| self.to_editor(d)).collect()
    }
}
