use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a time-ordered identifier so records sort by creation instant.
pub fn new_record_id() -> Uuid {
    Uuid::now_v7()
}

/// Finds the record with the given id in a slice of identifiable records.
pub fn find_by_id<T: Identifiable>(records: &[T], id: Uuid) -> Option<&T> {
    records.iter().find(|record| record.id() == id)
}

/// Mutable counterpart of [`find_by_id`].
pub fn find_by_id_mut<T: Identifiable>(records: &mut [T], id: Uuid) -> Option<&mut T> {
    records.iter_mut().find(|record| record.id() == id)
}
