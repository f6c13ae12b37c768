//! In-memory dataset served when no backend is configured.

use serde_json::{Value, json};

/// The one account the mock login accepts.
pub struct MockAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

pub const ADMIN_ACCOUNT: MockAccount = MockAccount {
    email: "admin@example.com",
    password: "admin123",
    name: "Admin User",
    role: "admin",
};

fn mock_user(id: &str, name: &str, email: &str, premium: bool, country: &str, registered: &str) -> Value {
    let membership = if premium { "premium" } else { "free" };
    json!({
        "id": id,
        "name": name,
        "email": email,
        "membership_status": membership,
        "provider": "email_and_password",
        "referrer_id": null,
        "last_seen": null,
        "registration_date": registered,
        "used_campaign_codes": [],
        "notification_preferences": {
            "coordinates_notification": true,
            "frequency": 7,
            "proofs_notification": true
        },
        "onboarding_data": {
            "current_country": country,
            "target_country": country,
            "days_in_current_country": 0,
            "days_in_target_country": 0,
            "minimum_days_in_current_country": 183,
            "minimum_days_in_target_country": 183,
            "notifications_frequency": null,
            "onboarding_done": true,
            "proofList": []
        }
    })
}

#[must_use]
pub fn users() -> Value {
    Value::Array(vec![
        mock_user("1", "John Doe", "john@example.com", true, "United States", "2024-01-15"),
        mock_user("2", "Maria Garcia", "maria@example.com", false, "Spain", "2024-02-01"),
        mock_user("3", "Hans Schmidt", "hans@example.com", true, "Germany", "2024-01-20"),
        mock_user("4", "Sophie Martin", "sophie@example.com", false, "France", "2024-02-10"),
        mock_user("5", "Luigi Romano", "luigi@example.com", true, "Italy", "2024-02-15"),
    ])
}

fn mock_proof(id: &str, user_id: &str, proof_type: &str, title: &str, country: &str, noted_at: &str) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "proof_type": proof_type,
        "kind": "document",
        "title": title,
        "country_code": country,
        "noted_at": noted_at,
        "inserted_at": noted_at,
        "url": null,
        "file_storage_id": null
    })
}

#[must_use]
pub fn proofs() -> Value {
    Value::Array(vec![
        mock_proof("1", "1", "Identity Document", "Passport verification", "US", "2024-02-18"),
        mock_proof("2", "2", "Address Proof", "Utility bill verification", "ES", "2024-02-17"),
        mock_proof("3", "3", "Identity Document", "Driver's license verification", "DE", "2024-02-16"),
        mock_proof("4", "4", "Address Proof", "Bank statement verification", "FR", "2024-02-15"),
        mock_proof("5", "5", "Identity Document", "National ID verification", "IT", "2024-02-14"),
    ])
}

#[must_use]
pub fn statistics() -> Value {
    json!({
        "userTypes": {
            "freemium": 2853,
            "premium": 947,
            "totalUsers": 3800,
            "conversionRate": "24.9%"
        },
        "recentActivity": {
            "newUsersToday": 45,
            "newUsersThisWeek": 320,
            "newUsersThisMonth": 1250
        },
        "topCountries": [
            { "country": "United States", "users": 1200, "percentage": "31.6%" },
            { "country": "United Kingdom", "users": 580, "percentage": "15.3%" },
            { "country": "Germany", "users": 420, "percentage": "11.1%" },
            { "country": "France", "users": 380, "percentage": "10.0%" },
            { "country": "Spain", "users": 340, "percentage": "8.9%" }
        ],
        "userGrowth": [
            { "month": "Jan", "freemium": 2100, "premium": 700 },
            { "month": "Feb", "freemium": 2300, "premium": 780 },
            { "month": "Mar", "freemium": 2500, "premium": 850 },
            { "month": "Apr", "freemium": 2650, "premium": 890 },
            { "month": "May", "freemium": 2750, "premium": 920 },
            { "month": "Jun", "freemium": 2853, "premium": 947 }
        ],
        "onboardingSuccess": {
            "completed": 3420,
            "inProgress": 280,
            "stalled": 100,
            "completionRate": "90%"
        }
    })
}
