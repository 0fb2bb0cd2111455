/// The primitive a scalar or vector-of-scalar verb reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Int,
    UInt,
    Long,
    ULong,
    Short,
    Byte,
    ByteUnaligned,
    Float,
    Double,
    Boolean,
    Char,
    String,
    String8,
    StrongBinder,
}

/// The decoded shape of one `call` verb, resolved from [`VERB_TABLE`].
///
/// A `phf::phf_map!` keyed on the bare verb rather than a function-pointer
/// table, since several verbs (e.g. `readShort`/`readByte`) share the same
/// reader with only a width/signedness difference baked into [`Scalar`]
/// (§4.8, "Dispatch implementation note").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Scalar(Scalar),
    Vector(Scalar),
    Parcelable,
    ParcelableVector,
    List,
    ParceledListSlice,
    Bundle,
}

pub static VERB_TABLE: phf::Map<&'static str, Op> = phf::phf_map! {
    "readInt" => Op::Scalar(Scalar::Int),
    "readUInt" => Op::Scalar(Scalar::UInt),
    "readLong" => Op::Scalar(Scalar::Long),
    "readULong" => Op::Scalar(Scalar::ULong),
    "readShort" => Op::Scalar(Scalar::Short),
    "readByte" => Op::Scalar(Scalar::Byte),
    "readByteUnaligned" => Op::Scalar(Scalar::ByteUnaligned),
    "readFloat" => Op::Scalar(Scalar::Float),
    "readDouble" => Op::Scalar(Scalar::Double),
    "readBoolean" => Op::Scalar(Scalar::Boolean),
    "readChar" => Op::Scalar(Scalar::Char),
    "readString" => Op::Scalar(Scalar::String),
    "readString8" => Op::Scalar(Scalar::String8),
    "readStrongBinder" => Op::Scalar(Scalar::StrongBinder),

    "readIntVector" => Op::Vector(Scalar::Int),
    "readUIntVector" => Op::Vector(Scalar::UInt),
    "readLongVector" => Op::Vector(Scalar::Long),
    "readULongVector" => Op::Vector(Scalar::ULong),
    "readShortVector" => Op::Vector(Scalar::Short),
    "readByteVector" => Op::Vector(Scalar::Byte),
    "readFloatVector" => Op::Vector(Scalar::Float),
    "readDoubleVector" => Op::Vector(Scalar::Double),
    "readBooleanVector" => Op::Vector(Scalar::Boolean),
    "readCharVector" => Op::Vector(Scalar::Char),
    "readStringVector" => Op::Vector(Scalar::String),
    "readString8Vector" => Op::Vector(Scalar::String8),
    "readStrongBinderVector" => Op::Vector(Scalar::StrongBinder),

    "readParcelable" => Op::Parcelable,
    "readParcelableVector" => Op::ParcelableVector,
    "readList" => Op::List,
    "readParceledListSlice" => Op::ParceledListSlice,
    "readBundle" => Op::Bundle,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_scalar_and_vector_verbs() {
        assert_eq!(VERB_TABLE.get("readInt"), Some(&Op::Scalar(Scalar::Int)));
        assert_eq!(VERB_TABLE.get("readIntVector"), Some(&Op::Vector(Scalar::Int)));
        assert_eq!(VERB_TABLE.get("readParcelable"), Some(&Op::Parcelable));
        assert_eq!(VERB_TABLE.get("bogus"), None);
    }
}
