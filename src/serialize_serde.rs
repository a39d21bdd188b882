use serde::{Serialize, Deserialize, Deserializer, Serializer, de::{self, Visitor}, ser::SerializeStruct};
use crate::{util, Modulus, RingParameters};

impl Serialize for Modulus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        serializer.serialize_u64(self.value())
    }
}

impl<'de> Deserialize<'de> for Modulus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        struct U64Visitor;
        impl<'de> Visitor<'de> for U64Visitor {
            type Value = u64;
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("u64")
            }
            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where E: de::Error, {
                Ok(v)
            }
        }
        let value = deserializer.deserialize_u64(U64Visitor)?;
        if value == 1 || util::get_significant_bit_count(value) > util::HE_MOD_BIT_COUNT_MAX {
            return Err(de::Error::custom(format!("invalid modulus {}", value)));
        }
        Ok(Modulus::new(value))
    }
}

impl Serialize for RingParameters {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        let mut s = serializer.serialize_struct("RingParameters", 3)?;
        s.serialize_field("degree", &self.degree())?;
        s.serialize_field("modulus", self.modulus())?;
        s.serialize_field("root", &self.root())?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for RingParameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        struct RingParametersVisitor;
        impl<'de> Visitor<'de> for RingParametersVisitor {
            type Value = RingParameters;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("struct RingParameters")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where A: de::SeqAccess<'de>,
            {
                let degree = seq.next_element::<usize>()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let modulus = seq.next_element::<Modulus>()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let root = seq.next_element::<u64>()?.ok_or_else(|| de::Error::invalid_length(2, &self))?;
                // Re-validate: the tables are rebuilt, never trusted.
                RingParameters::build(degree, modulus.value(), Some(root)).map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where A: de::MapAccess<'de>,
            {
                let mut degree = None;
                let mut modulus = None;
                let mut root = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "degree" => {
                            if degree.is_some() {return Err(de::Error::duplicate_field("degree"));}
                            degree = Some(map.next_value::<usize>()?);
                        }
                        "modulus" => {
                            if modulus.is_some() {return Err(de::Error::duplicate_field("modulus"));}
                            modulus = Some(map.next_value::<Modulus>()?);
                        }
                        "root" => {
                            if root.is_some() {return Err(de::Error::duplicate_field("root"));}
                            root = Some(map.next_value::<u64>()?);
                        }
                        _ => {map.next_value::<de::IgnoredAny>()?;}
                    }
                }
                let degree = degree.ok_or_else(|| de::Error::missing_field("degree"))?;
                let modulus: Modulus = modulus.ok_or_else(|| de::Error::missing_field("modulus"))?;
                let root = root.ok_or_else(|| de::Error::missing_field("root"))?;
                RingParameters::build(degree, modulus.value(), Some(root)).map_err(de::Error::custom)
            }

        }
        deserializer.deserialize_struct(
            "RingParameters",
            &["degree", "modulus", "root"],
            RingParametersVisitor
        )
    }
}
