//! Development data seeder.
//!
//! Populates the help type catalog and a pool of fake students and mentors.
//! Safe to re-run: help types upsert by name and users by email, so existing
//! rows are left alone.

use std::time::Instant;

use bcrypt::hash;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::{PgPool, Postgres, Transaction};

use crate::modules::users::model::UserRole;

/// Help types every deployment starts with.
const HELP_TYPES: &[(&str, &str)] = &[
    ("Career Advice", "Long-term career planning and direction"),
    ("Resume Review", "Feedback on resumes and cover letters"),
    ("Interview Preparation", "Mock interviews and interview strategy"),
    ("Course Selection", "Choosing courses and specializations"),
    ("Research Guidance", "Finding and approaching research opportunities"),
    ("Internship Search", "Finding and applying for internships"),
    ("Project Feedback", "Design and code review for personal projects"),
    ("Graduate School Applications", "Applying to graduate programs"),
];

const PROGRAMS: &[&str] = &[
    "Computer Science",
    "Software Engineering",
    "Data Science",
    "Information Systems",
    "Electrical Engineering",
];

const TERMS: &[&str] = &["Fall 2025", "Winter 2026", "Spring 2026"];

const TOPICS: &[&str] = &[
    "career planning",
    "resumes",
    "interviews",
    "research",
    "internships",
    "distributed systems",
    "web development",
    "machine learning",
];

struct UserSeed {
    first_name: String,
    last_name: String,
    email: String,
    role: UserRole,
    program: String,
    term: String,
    specialties: Vec<String>,
    interests: Vec<String>,
}

pub async fn seed_database(
    db: &PgPool,
    num_students: usize,
    num_mentors: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Students: {}", num_students);
    println!("   - Mentors: {}", num_mentors);

    println!("\n📋 Upserting help types...");
    insert_help_types(db).await?;
    println!("   ✓ {} help types present", HELP_TYPES.len());

    // bcrypt is the slow part, so hash once at a low cost and reuse it for
    // every seeded account. Real registrations go through DEFAULT_COST.
    let password_hash =
        hash("password123", 4).map_err(|e| format!("Failed to hash password: {}", e))?;

    println!("\n👥 Generating fake users...");
    let users = generate_users(num_students, num_mentors);

    println!("\n💾 Inserting users...");
    let inserted = insert_users_batch(db, &users, &password_hash).await?;
    println!(
        "   ✓ Inserted {} users ({} already present)",
        inserted,
        users.len() - inserted
    );

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("\n📝 Default password for all seeded users: password123");

    Ok(())
}

async fn insert_help_types(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    for (name, description) in HELP_TYPES {
        sqlx::query(
            "INSERT INTO help_types (name, description) VALUES ($1, $2)
             ON CONFLICT (name) WHERE is_deleted = FALSE DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(db)
        .await?;
    }
    Ok(())
}

fn generate_users(num_students: usize, num_mentors: usize) -> Vec<UserSeed> {
    let mut rng = rand::thread_rng();
    let mut users = Vec::with_capacity(num_students + num_mentors);

    for i in 0..num_students {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let email = format!(
            "{}.{}+student{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            i
        );
        users.push(UserSeed {
            first_name,
            last_name,
            email,
            role: UserRole::Student,
            program: pick(&mut rng, PROGRAMS).to_string(),
            term: pick(&mut rng, TERMS).to_string(),
            specialties: Vec::new(),
            interests: pick_many(&mut rng, TOPICS, 2),
        });
    }

    for i in 0..num_mentors {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let email = format!(
            "{}.{}+mentor{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            i
        );
        users.push(UserSeed {
            first_name,
            last_name,
            email,
            role: UserRole::Mentor,
            program: String::new(),
            term: String::new(),
            specialties: pick_many(&mut rng, TOPICS, 3),
            interests: Vec::new(),
        });
    }

    users
}

fn pick<'a, R: Rng>(rng: &mut R, values: &'a [&str]) -> &'a str {
    values.choose(rng).copied().unwrap_or("")
}

fn pick_many<R: Rng>(rng: &mut R, values: &[&str], count: usize) -> Vec<String> {
    values
        .choose_multiple(rng, count)
        .map(|topic| topic.to_string())
        .collect()
}

async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
    password_hash: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut tx = db.begin().await?;

    // 10 params per user keeps a chunk well under Postgres's limit.
    const BATCH_SIZE: usize = 500;
    let mut inserted = 0usize;

    for chunk in users.chunks(BATCH_SIZE) {
        inserted += insert_users_chunk(&mut tx, chunk, password_hash).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
    password_hash: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut query = String::from(
        "INSERT INTO users (first_name, last_name, email, password, role, program, term, \
         specialties, interests, is_verified) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 10;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7,
            p + 8,
            p + 9,
            p + 10
        ));
    }

    query.push_str(" ON CONFLICT (email) WHERE is_deleted = FALSE DO NOTHING");

    let mut q = sqlx::query(&query);
    for user in users {
        q = q
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(password_hash)
            .bind(user.role)
            .bind(&user.program)
            .bind(&user.term)
            .bind(&user.specialties)
            .bind(&user.interests)
            .bind(true);
    }

    let result = q.execute(&mut **tx).await?;
    Ok(result.rows_affected() as usize)
}

/// Clears seeded users and everything hanging off them. Admins and the help
/// type catalog survive.
pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    let sessions_deleted = sqlx::query(
        "DELETE FROM mentorship_sessions
         WHERE student_id IN (SELECT id FROM users WHERE email LIKE '%@example.com')
            OR mentor_id IN (SELECT id FROM users WHERE email LIKE '%@example.com')",
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let requests_deleted = sqlx::query(
        "DELETE FROM mentorship_requests
         WHERE student_id IN (SELECT id FROM users WHERE email LIKE '%@example.com')
            OR mentor_id IN (SELECT id FROM users WHERE email LIKE '%@example.com')",
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let users_deleted =
        sqlx::query("DELETE FROM users WHERE email LIKE '%@example.com' AND role <> $1")
            .bind(UserRole::Admin)
            .execute(&mut *tx)
            .await?
            .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} sessions, {} requests, and {} users in {:?}",
        sessions_deleted,
        requests_deleted,
        users_deleted,
        start_time.elapsed()
    );
    println!("✅ Seeded data cleared successfully!");

    Ok(())
}
