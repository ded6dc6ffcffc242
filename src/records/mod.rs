pub mod flow_record;
pub mod protocol_record;
pub mod tag_record;
