//! Ressourcen-Arena für Geometrie, Materialien und Texturen.
//!
//! Jede Ressource gehört genau einer Entity. Beim Entsorgen einer Entity
//! gibt `release_owned_by` alle ihre Ressourcen in einem Schritt frei.

use super::mesh::MeshData;
use super::scene_graph::EntityId;
use image::RgbaImage;
use indexmap::IndexMap;

/// Handle auf eine Ressource in der Arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(u64);

impl ResourceHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Oberflächenbeschreibung (nur Farbe und optionale Textur).
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub base_color: [f32; 4],
    pub texture: Option<ResourceHandle>,
    pub double_sided: bool,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
            double_sided: false,
        }
    }
}

/// Inhalt eines Arena-Eintrags.
#[derive(Debug, Clone)]
pub enum GpuResource {
    Geometry(MeshData),
    Material(MaterialDesc),
    Texture(RgbaImage),
}

#[derive(Debug)]
struct ResourceSlot {
    owner: EntityId,
    resource: GpuResource,
}

/// Zentrale Ablage aller exklusiv besessenen Grafik-Ressourcen.
#[derive(Debug, Default)]
pub struct ResourceArena {
    slots: IndexMap<ResourceHandle, ResourceSlot>,
    next_id: u64,
}

impl ResourceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert eine Ressource für `owner` und liefert ihr Handle.
    pub fn register(&mut self, owner: EntityId, resource: GpuResource) -> ResourceHandle {
        self.next_id += 1;
        let handle = ResourceHandle(self.next_id);
        self.slots.insert(handle, ResourceSlot { owner, resource });
        handle
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&GpuResource> {
        self.slots.get(&handle).map(|slot| &slot.resource)
    }

    /// Geometrie hinter einem Handle, `None` bei anderem Typ.
    pub fn mesh(&self, handle: ResourceHandle) -> Option<&MeshData> {
        match self.get(handle)? {
            GpuResource::Geometry(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn texture(&self, handle: ResourceHandle) -> Option<&RgbaImage> {
        match self.get(handle)? {
            GpuResource::Texture(image) => Some(image),
            _ => None,
        }
    }

    /// Ersetzt den Inhalt einer bestehenden Ressource (z.B. Ribbon-Neuaufbau).
    pub fn replace(&mut self, handle: ResourceHandle, resource: GpuResource) -> bool {
        match self.slots.get_mut(&handle) {
            Some(slot) => {
                slot.resource = resource;
                true
            }
            None => false,
        }
    }

    /// Gibt eine einzelne Ressource frei.
    pub fn release(&mut self, handle: ResourceHandle) -> Option<GpuResource> {
        self.slots.shift_remove(&handle).map(|slot| slot.resource)
    }

    /// Gibt alle Ressourcen eines Besitzers frei und liefert deren Anzahl.
    pub fn release_owned_by(&mut self, owner: EntityId) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.owner != owner);
        let released = before - self.slots.len();
        if released > 0 {
            log::debug!("{} Ressourcen von Entity {:?} freigegeben", released, owner);
        }
        released
    }

    /// Anzahl noch lebender Ressourcen.
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_owned_by_only_frees_owner() {
        let mut arena = ResourceArena::new();
        let a = EntityId::from_raw(1);
        let b = EntityId::from_raw(2);
        arena.register(a, GpuResource::Geometry(MeshData::default()));
        arena.register(a, GpuResource::Material(MaterialDesc::default()));
        let kept = arena.register(b, GpuResource::Texture(RgbaImage::new(2, 2)));

        assert_eq!(arena.release_owned_by(a), 2);
        assert_eq!(arena.live_count(), 1);
        assert!(arena.texture(kept).is_some());
    }
}
