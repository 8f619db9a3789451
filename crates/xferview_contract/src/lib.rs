pub mod codec;
pub mod model;

pub use codec::{decode_list, CodecError};
pub use model::{
    display_filename, parse_timestamp, CoordinatorId, OwnerId, Resource, ResourceId,
    TransferId, TransferRecord,
};
