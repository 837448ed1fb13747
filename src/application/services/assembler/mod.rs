use crate::domain::facilities::facility::{Facility, FacilityRecord, Location, TagRef};

pub fn assemble_facility(record: FacilityRecord, tags: Vec<TagRef>) -> Facility {
    Facility {
        id: record.id,
        name: record.name,
        created_at: record.created_at,
        location: Location {
            id: record.location_id,
            city: record.city,
            address: record.address,
            zip_code: record.zip_code,
            country_code: record.country_code,
            phone_number: record.phone_number,
        },
        tags,
    }
}
