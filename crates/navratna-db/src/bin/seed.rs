//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # 4 stones per gem type (default)
//! cargo run -p navratna-db --bin seed
//!
//! # More stones
//! cargo run -p navratna-db --bin seed -- --count 20
//!
//! # Specify database path
//! cargo run -p navratna-db --bin seed -- --db ./data/navratna.db
//! ```
//!
//! ## Generated Data
//! - Stones for each of the nine Navratna gems: `{CODE}-{NNNN}`
//! - Suppliers, clients (astrologers, jewellers, temples, individuals)
//! - A handful of sales (a third fully paid, a third partial, a third unpaid)
//! - Lab submissions at every lifecycle step
//! - Consultations with follow-ups, and open tasks

use chrono::{Duration, Utc};
use std::env;

use navratna_core::types::{
    Certification, CertificationInput, CertificationStatus, Client, ClientInput, ClientType,
    Consultation, ConsultationInput, ConsultationStatus, InventoryInput, InventoryItem,
    LoyaltyLevel, QualityGrade, RelatedType, SaleInput, StoneStatus, Supplier, SupplierInput,
    SupplierType, Task, TaskInput, TaskPriority, TaskStatus,
};
use navratna_db::{Database, DbConfig};

/// (code, gem type, base price per carat in rupees, origins)
const GEMS: &[(&str, &str, i64, &[&str])] = &[
    ("RUB", "Ruby", 50_000, &["Burma", "Mozambique", "Thailand"]),
    ("PRL", "Pearl", 5_000, &["Basra", "South Sea"]),
    ("COR", "Red Coral", 3_000, &["Italy", "Japan"]),
    ("EMR", "Emerald", 40_000, &["Colombia", "Zambia", "Brazil"]),
    ("YSP", "Yellow Sapphire", 35_000, &["Ceylon", "Thailand"]),
    ("DIA", "Diamond", 1_50_000, &["Africa", "Surat"]),
    ("BSP", "Blue Sapphire", 60_000, &["Kashmir", "Ceylon", "Madagascar"]),
    ("HES", "Hessonite", 4_000, &["Ceylon", "Africa"]),
    ("CAT", "Cat's Eye", 15_000, &["Ceylon", "India"]),
];

const COLORS: &[&str] = &["Vivid", "Intense", "Medium", "Light"];
const CLARITIES: &[&str] = &["VVS", "Eye Clean", "VS", "SI"];
const SHAPES: &[&str] = &["Oval", "Cushion", "Round", "Pear", "Cabochon"];
const LABS: &[&str] = &["GIA", "IGI", "GRS", "GII"];

const CLIENTS: &[(&str, ClientType, LoyaltyLevel, &str)] = &[
    ("Pandit Ramesh Sharma", ClientType::Astrologer, LoyaltyLevel::Gold, "Jaipur"),
    ("Acharya Vinod Tiwari", ClientType::Astrologer, LoyaltyLevel::Silver, "Varanasi"),
    ("Kothari Jewellers", ClientType::Jeweler, LoyaltyLevel::Platinum, "Mumbai"),
    ("Shri Hanuman Mandir Trust", ClientType::Temple, LoyaltyLevel::Bronze, "Ujjain"),
    ("Meera Joshi", ClientType::Individual, LoyaltyLevel::Bronze, "Pune"),
    ("Rajat Mehta", ClientType::Individual, LoyaltyLevel::Silver, "Delhi"),
];

const SUPPLIERS: &[(&str, SupplierType, &str, &[&str], i64)] = &[
    ("Ratnapura Gem House", SupplierType::International, "Ratnapura, Sri Lanka", &["Blue Sapphire", "Yellow Sapphire", "Cat's Eye", "Hessonite"], 5),
    ("Mogok Traders", SupplierType::International, "Mogok, Myanmar", &["Ruby"], 4),
    ("Johari Bazaar Wholesale", SupplierType::Domestic, "Jaipur, Rajasthan", &["Emerald", "Red Coral", "Pearl"], 4),
    ("Surat Diamond Exchange", SupplierType::Domestic, "Surat, Gujarat", &["Diamond"], 3),
];

const ZODIAC: &[(&str, &str)] = &[
    ("Aries", "Red Coral"),
    ("Taurus", "Diamond"),
    ("Gemini", "Emerald"),
    ("Cancer", "Pearl"),
    ("Leo", "Ruby"),
    ("Sagittarius", "Yellow Sapphire"),
    ("Capricorn", "Blue Sapphire"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut per_gem: usize = 4;
    let mut db_path = String::from("./navratna_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    per_gem = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Navratna Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Stones per gem type (default: 4)");
                println!("  -d, --db <PATH>    Database file path (default: ./navratna_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("💎 Navratna Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Stones per gem: {}", per_gem);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} stones", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let now = Utc::now();
    let today = now.date_naive();

    // Suppliers
    let mut suppliers = Vec::new();
    for (name, supplier_type, location, gems, rating) in SUPPLIERS {
        let supplier = Supplier::new(
            SupplierInput {
                name: name.to_string(),
                supplier_type: *supplier_type,
                location: location.to_string(),
                contact_person: None,
                phone: None,
                email: None,
                gemstone_types: gems.iter().map(|g| g.to_string()).collect(),
                rating: Some(*rating),
                notes: None,
            },
            now,
        );
        db.suppliers().insert(&supplier).await?;
        suppliers.push(supplier);
    }
    println!("✓ {} suppliers", suppliers.len());

    // Stones
    let mut stones = Vec::new();
    for (gem_idx, (code, gem, base_rupees, origins)) in GEMS.iter().enumerate() {
        let supplier_id = suppliers
            .iter()
            .find(|s| s.gemstone_types.iter().any(|g| g.as_str() == *gem))
            .map(|s| s.id.clone());

        for n in 0..per_gem {
            let stone = generate_stone(
                code,
                gem,
                *base_rupees,
                origins,
                gem_idx * 100 + n,
                n + 1,
                supplier_id.clone(),
            );
            if let Err(e) = db.inventory().insert(&stone).await {
                eprintln!("Failed to insert {}: {}", stone.stone_code, e);
                continue;
            }
            stones.push(stone);
        }
    }
    println!("✓ {} stones", stones.len());

    // Clients
    let mut clients = Vec::new();
    for (name, client_type, loyalty, city) in CLIENTS {
        let client = Client::new(
            ClientInput {
                name: name.to_string(),
                client_type: *client_type,
                loyalty_level: *loyalty,
                phone: Some(format!("98{:08}", clients.len() * 7_654_321 % 100_000_000)),
                email: None,
                city: Some(city.to_string()),
                address: None,
                gstin: None,
                notes: None,
            },
            now,
        );
        db.clients().insert(&client).await?;
        clients.push(client);
    }
    println!("✓ {} clients", clients.len());

    // Sales: every fourth stone
    let mut sold = 0;
    for (idx, stone) in stones.iter().enumerate().filter(|(idx, _)| idx % 4 == 0) {
        let client = &clients[idx % clients.len()];
        // A small negotiated discount off the asking price
        let discount = (idx as i64 % 5) * 1_000_00;
        let total = (stone.selling_price_paise - discount).max(100);
        let paid = match idx % 3 {
            0 => total,
            1 => total / 2,
            _ => 0,
        };
        let input = SaleInput {
            client_id: client.id.clone(),
            inventory_id: stone.id.clone(),
            sale_date: today - Duration::days((idx % 60) as i64),
            total_amount_paise: total,
            amount_paid_paise: paid,
            payment_status: None,
            notes: None,
        };
        match db.sales().create(input, "NR").await {
            Ok(_) => sold += 1,
            Err(e) => eprintln!("Failed to sell {}: {}", stone.stone_code, e),
        }
    }
    println!("✓ {} sales", sold);

    // Certifications: one per unsold, uncertified stone, spread over the lifecycle
    let mut submitted = 0;
    for (idx, stone) in stones
        .iter()
        .enumerate()
        .filter(|(idx, s)| idx % 4 != 0 && !s.is_certified())
        .take(8)
    {
        let status = match submitted % 3 {
            0 => CertificationStatus::Pending,
            1 => CertificationStatus::InProgress,
            _ => CertificationStatus::Received,
        };
        let cert = Certification::new(
            CertificationInput {
                inventory_id: stone.id.clone(),
                lab: LABS[idx % LABS.len()].to_string(),
                submitted_date: today - Duration::days(10 + submitted as i64),
                expected_date: Some(today + Duration::days(7)),
                certificate_number: None,
                status,
                cost_paise: 2_500_00,
                notes: None,
            },
            now,
        );
        db.certifications().insert(&cert).await?;
        submitted += 1;
    }
    println!("✓ {} lab submissions", submitted);

    // Consultations
    for (idx, (sign, stone)) in ZODIAC.iter().enumerate() {
        let client = &clients[idx % clients.len()];
        let consultation = Consultation::new(
            ConsultationInput {
                client_id: client.id.clone(),
                consultation_date: today - Duration::days(idx as i64 * 3),
                topic: format!("{} birth chart reading", sign),
                zodiac_sign: Some(sign.to_string()),
                recommended_stones: vec![stone.to_string()],
                fee_paise: 1_100_00 + idx as i64 * 500_00,
                status: if idx % 2 == 0 {
                    ConsultationStatus::Completed
                } else {
                    ConsultationStatus::Scheduled
                },
                follow_up_date: Some(today + Duration::days(idx as i64 * 5 - 5)),
                notes: None,
            },
            now,
        );
        db.consultations().insert(&consultation).await?;
    }
    println!("✓ {} consultations", ZODIAC.len());

    // Tasks
    let tasks = [
        ("File GSTR-1", -3, TaskPriority::High, None),
        ("Collect certificate from GRS", 2, TaskPriority::Medium, Some(RelatedType::Stone)),
        ("Call Kothari Jewellers about Diwali order", 5, TaskPriority::High, Some(RelatedType::Client)),
        ("Reorder Basra pearls", 14, TaskPriority::Low, Some(RelatedType::Supplier)),
    ];
    for (title, due_in, priority, related_type) in tasks {
        let related_id = match related_type {
            Some(RelatedType::Stone) => stones.first().map(|s| s.id.clone()),
            Some(RelatedType::Client) => clients.get(2).map(|c| c.id.clone()),
            Some(RelatedType::Supplier) => suppliers.get(2).map(|s| s.id.clone()),
            None => None,
        };
        let task = Task::new(
            TaskInput {
                title: title.to_string(),
                description: None,
                due_date: Some(today + Duration::days(due_in)),
                priority,
                status: TaskStatus::Pending,
                related_type: related_type.filter(|_| related_id.is_some()),
                related_id,
            },
            now,
        );
        db.tasks().insert(&task).await?;
    }
    println!("✓ {} tasks", tasks.len());

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seeded in {:?}", elapsed);

    let stats = db.inventory().stats().await?;
    println!(
        "  Stock: {} in stock, {} sold, value {}",
        stats.in_stock_count,
        stats.sold_count,
        navratna_core::Money::from_paise(stats.stock_value_paise)
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one stone with plausible attributes.
fn generate_stone(
    code: &str,
    gem: &str,
    base_rupees: i64,
    origins: &[&str],
    seed: usize,
    number: usize,
    supplier_id: Option<String>,
) -> InventoryItem {
    // 0.75 - 7.2 ct
    let carat = 0.75 + ((seed * 37) % 65) as f64 / 10.0;
    let grade = QualityGrade::ALL[(seed * 7) % QualityGrade::ALL.len()];

    let purchase_rupees = (base_rupees as f64 * carat * 0.6).round() as i64;
    let markup_pct = 30 + (seed * 13) % 40;
    let selling_rupees = purchase_rupees + purchase_rupees * markup_pct as i64 / 100;

    let certified = seed % 3 == 0;

    InventoryItem::new(
        InventoryInput {
            stone_code: format!("{}-{:04}", code, number),
            gem_type: gem.to_string(),
            carat: (carat * 100.0).round() / 100.0,
            origin: origins[seed % origins.len()].to_string(),
            shape: Some(SHAPES[seed % SHAPES.len()].to_string()),
            color: Some(COLORS[(seed / 2) % COLORS.len()].to_string()),
            clarity: Some(CLARITIES[(seed / 3) % CLARITIES.len()].to_string()),
            quality_grade: grade,
            certification_lab: certified.then(|| LABS[seed % LABS.len()].to_string()),
            certificate_file: None,
            purchase_price_paise: purchase_rupees * 100,
            selling_price_paise: selling_rupees * 100,
            status: StoneStatus::InStock,
            tags: if seed % 5 == 0 {
                vec!["premium".to_string()]
            } else {
                Vec::new()
            },
            supplier_id,
            notes: None,
        },
        Utc::now(),
    )
}
