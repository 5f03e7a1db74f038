//! Request/response types shared by the server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// A user's ledger state as shown to clients.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub name: String,
        /// Balance in integer cents; may be negative.
        pub balance_minor: i64,
        /// Display form ("1.50€").
        pub balance: String,
        pub drinks: i64,
        pub roles: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub password: String,
        pub roles: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditUser {
        pub name: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetDrinks {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<UserView>,
    }
}

pub mod drink {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DrinkView {
        pub id: Uuid,
        pub name: String,
        pub price_minor: i64,
        pub stock: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DrinkNew {
        pub name: String,
        pub price_minor: i64,
        #[serde(default)]
        pub stock: i64,
    }

    /// Body for `POST /drink/buy`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BuyDrink {
        pub drink: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DrinksResponse {
        pub drinks: Vec<DrinkView>,
    }
}

pub mod transaction {
    use super::*;

    /// One purchase, as shown in a user's history.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub drink: String,
        pub description: String,
        pub amount_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod restocking {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RestockingNew {
        pub drink: String,
        pub quantity: i64,
        pub total_minor: i64,
        pub contributors: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionView {
        pub user: String,
        pub share_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RestockingView {
        pub id: Uuid,
        pub drink_id: Uuid,
        pub quantity: i64,
        pub total_minor: i64,
        pub created_at: DateTime<Utc>,
        pub contributions: Vec<ContributionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RestockingsResponse {
        pub restockings: Vec<RestockingView>,
    }
}
