use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Month, macros::date};

use fluxo::{
    db::initialize,
    models::{Kind, Recurrence, TransactionStatus, UserID},
    stores::{SqliteLedgerStore, sqlite::NewTransaction},
};

/// A utility for creating a test database for the fluxo API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The default expense categories, available to every user.
const EXPENSE_CATEGORIES: [(&str, &str); 11] = [
    ("Moradia", "#EF4444"),
    ("Alimentação", "#F59E0B"),
    ("Transporte", "#3B82F6"),
    ("Saúde", "#10B981"),
    ("Educação", "#8B5CF6"),
    ("Entretenimento", "#EC4899"),
    ("Compras", "#6366F1"),
    ("Serviços", "#14B8A6"),
    ("Pessoal", "#F97316"),
    ("Investimentos", "#84CC16"),
    ("Outros", "#6B7280"),
];

/// The default income categories, available to every user.
const INCOME_CATEGORIES: [(&str, &str); 6] = [
    ("Salário", "#22C55E"),
    ("Freelance", "#06B6D4"),
    ("Investimentos", "#84CC16"),
    ("Aluguel recebido", "#A855F7"),
    ("Bônus", "#EAB308"),
    ("Outros", "#6B7280"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize(&conn)?;

    let store = SqliteLedgerStore::new(Arc::new(Mutex::new(conn)));

    println!("Creating default categories...");

    let mut expense_ids = Vec::new();
    for (name, color) in EXPENSE_CATEGORIES {
        let category = store.insert_category(name, color, Kind::Expense, None)?;
        expense_ids.push(category.id);
    }

    let mut income_ids = Vec::new();
    for (name, color) in INCOME_CATEGORIES {
        let category = store.insert_category(name, color, Kind::Income, None)?;
        income_ids.push(category.id);
    }

    println!("Creating test transactions and budgets...");

    let user_id = UserID::new(1);

    let transactions = [
        NewTransaction {
            user_id,
            category_id: income_ids[0],
            kind: Kind::Income,
            amount: 5200.0,
            date: date!(2025 - 01 - 01),
            recurrence: Recurrence::Monthly,
            status: TransactionStatus::Paid,
            description: "Salário mensal".to_owned(),
        },
        NewTransaction {
            user_id,
            category_id: income_ids[1],
            kind: Kind::Income,
            amount: 800.0,
            date: date!(2025 - 02 - 14),
            recurrence: Recurrence::None,
            status: TransactionStatus::Paid,
            description: "Projeto freelance".to_owned(),
        },
        NewTransaction {
            user_id,
            category_id: expense_ids[0],
            kind: Kind::Expense,
            amount: 1800.0,
            date: date!(2025 - 01 - 05),
            recurrence: Recurrence::Monthly,
            status: TransactionStatus::Paid,
            description: "Aluguel".to_owned(),
        },
        NewTransaction {
            user_id,
            category_id: expense_ids[1],
            kind: Kind::Expense,
            amount: 950.0,
            date: date!(2025 - 01 - 10),
            recurrence: Recurrence::Monthly,
            status: TransactionStatus::Paid,
            description: "Supermercado".to_owned(),
        },
        NewTransaction {
            user_id,
            category_id: expense_ids[7],
            kind: Kind::Expense,
            amount: 420.0,
            date: date!(2025 - 01 - 31),
            recurrence: Recurrence::Quarterly,
            status: TransactionStatus::Paid,
            description: "Seguro residencial".to_owned(),
        },
        NewTransaction {
            user_id,
            category_id: expense_ids[5],
            kind: Kind::Expense,
            amount: 120.0,
            date: date!(2025 - 03 - 08),
            recurrence: Recurrence::None,
            status: TransactionStatus::Pending,
            description: "Show (aguardando pagamento)".to_owned(),
        },
        NewTransaction {
            user_id,
            category_id: expense_ids[3],
            kind: Kind::Expense,
            amount: 310.0,
            date: date!(2024 - 06 - 30),
            recurrence: Recurrence::Annual,
            status: TransactionStatus::Paid,
            description: "Plano odontológico".to_owned(),
        },
    ];

    for transaction in transactions {
        store.insert_transaction(transaction)?;
    }

    for month in [Month::January, Month::February, Month::March] {
        store.insert_budget(user_id, expense_ids[0], month, 2025, 2000.0)?;
        store.insert_budget(user_id, expense_ids[1], month, 2025, 1000.0)?;
        store.insert_budget(user_id, expense_ids[5], month, 2025, 300.0)?;
    }

    println!("Success!");

    Ok(())
}
