use rust_decimal::Decimal;

use crate::database::Database;

struct SeedMedication {
    name: &'static str,
    strength: &'static str,
    manufacturer: &'static str,
    category: &'static str,
    form_factor: &'static str,
    requires_prescription: bool,
}

struct SeedPharmacy {
    name: &'static str,
    address: &'static str,
    phone: &'static str,
    delivery_time: &'static str,
    distance: &'static str,
    latitude: Decimal,
    longitude: Decimal,
    delivery_fee: Decimal,
    rating: Decimal,
}

const COMMON_MEDICATIONS: &[SeedMedication] = &[
    SeedMedication {
        name: "Paracetamol",
        strength: "500mg",
        manufacturer: "Emzor Pharmaceuticals",
        category: "Pain Relief",
        form_factor: "Tablet",
        requires_prescription: false,
    },
    SeedMedication {
        name: "Ibuprofen",
        strength: "400mg",
        manufacturer: "May & Baker",
        category: "Pain Relief",
        form_factor: "Tablet",
        requires_prescription: false,
    },
    SeedMedication {
        name: "Amoxicillin",
        strength: "250mg",
        manufacturer: "GSK Nigeria",
        category: "Antibiotic",
        form_factor: "Capsule",
        requires_prescription: true,
    },
    SeedMedication {
        name: "Vitamin C",
        strength: "1000mg",
        manufacturer: "HealthGuard",
        category: "Supplement",
        form_factor: "Tablet",
        requires_prescription: false,
    },
    SeedMedication {
        name: "Cetirizine",
        strength: "10mg",
        manufacturer: "Pharma Plus",
        category: "Allergy",
        form_factor: "Tablet",
        requires_prescription: false,
    },
    SeedMedication {
        name: "Omeprazole",
        strength: "20mg",
        manufacturer: "MedCare",
        category: "Digestive",
        form_factor: "Capsule",
        requires_prescription: false,
    },
    SeedMedication {
        name: "Metformin",
        strength: "500mg",
        manufacturer: "Diabetes Solutions",
        category: "Diabetes",
        form_factor: "Tablet",
        requires_prescription: true,
    },
    SeedMedication {
        name: "Aspirin",
        strength: "75mg",
        manufacturer: "CardioHealth",
        category: "Cardiovascular",
        form_factor: "Tablet",
        requires_prescription: false,
    },
];

/// Seed the marketplace with demo data. Each table is only filled when it
/// is empty, so repeated startups leave existing rows alone.
pub async fn run(db: &Database) -> Result<(), sqlx::Error> {
    let sample_pharmacies = [
        SeedPharmacy {
            name: "Ocean View Pharmacy",
            address: "123 Beach Road, Coastal City",
            phone: "+1-555-0100",
            delivery_time: "15-20 min",
            distance: "0.5 km",
            latitude: Decimal::new(377_749, 4),
            longitude: Decimal::new(-1_224_194, 4),
            delivery_fee: Decimal::new(500, 2),
            rating: Decimal::new(48, 1),
        },
        SeedPharmacy {
            name: "HealthPlus Pharmacy",
            address: "456 Main Street, Downtown",
            phone: "+1-555-0200",
            delivery_time: "20-25 min",
            distance: "1.2 km",
            latitude: Decimal::new(377_849, 4),
            longitude: Decimal::new(-1_224_294, 4),
            delivery_fee: Decimal::new(300, 2),
            rating: Decimal::new(46, 1),
        },
    ];

    let medication_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM medications")
        .fetch_one(db)
        .await?;
    if medication_count == 0 {
        for med in COMMON_MEDICATIONS {
            sqlx::query(
                r#"
                INSERT INTO medications (name, strength, manufacturer, category, form_factor, requires_prescription)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(med.name)
            .bind(med.strength)
            .bind(med.manufacturer)
            .bind(med.category)
            .bind(med.form_factor)
            .bind(med.requires_prescription)
            .execute(db)
            .await?;
        }
        log::info!("seeded {} medications", COMMON_MEDICATIONS.len());
    } else {
        log::info!("medications already exist, skipping seed");
    }

    let pharmacy_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pharmacies")
        .fetch_one(db)
        .await?;
    if pharmacy_count == 0 {
        for pharmacy in &sample_pharmacies {
            sqlx::query(
                r#"
                INSERT INTO pharmacies (
                    name, address, phone, hours, rating, is_open_24_hours, delivery_time,
                    distance, latitude, longitude, delivery_fee, onboarding_status
                )
                VALUES ($1, $2, $3, '24/7', $4, TRUE, $5, $6, $7, $8, $9, 'active')
                "#,
            )
            .bind(pharmacy.name)
            .bind(pharmacy.address)
            .bind(pharmacy.phone)
            .bind(pharmacy.rating)
            .bind(pharmacy.delivery_time)
            .bind(pharmacy.distance)
            .bind(pharmacy.latitude)
            .bind(pharmacy.longitude)
            .bind(pharmacy.delivery_fee)
            .execute(db)
            .await?;
        }
        log::info!("seeded {} pharmacies", sample_pharmacies.len());
    } else {
        log::info!("pharmacies already exist, skipping seed");
    }

    Ok(())
}
