//! Biblion CLI - thin display collaborator over the library core.
//!
//! Owns no business state: every subcommand maps onto one service call.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use biblion::{
    config::AppConfig,
    models::{CopyStatus, SubscriptionType},
    store::JsonStore,
    LibraryService,
};

#[derive(Parser)]
#[command(name = "biblion", version, about = "Biblion - Library Management Core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a user account
    AddUser {
        username: String,
        password: String,
        #[arg(long)]
        admin: bool,
        /// basic, premium or vip
        #[arg(long, default_value = "basic")]
        subscription: String,
        #[arg(long, default_value_t = 365)]
        days: i64,
    },
    /// Switch a user's subscription tier and extend its expiry
    ChangeSubscription {
        user_id: Uuid,
        /// basic, premium or vip
        subscription: String,
        #[arg(long, default_value_t = 365)]
        days: i64,
    },
    /// Settle a user's outstanding penalties
    PayPenalties { user_id: Uuid },
    /// Drain and print a user's notifications
    Notifications { user_id: Uuid },
    /// List a user's loans
    Loans {
        user_id: Uuid,
        #[arg(long)]
        active: bool,
    },
    /// Add a title to the catalog
    AddBook {
        title: String,
        author: String,
        category: String,
        #[arg(long, default_value_t = 1)]
        copies: usize,
    },
    /// Append fresh copies to a title
    AddCopies { book_id: Uuid, count: usize },
    /// Overwrite the status of one copy (available, loaned, damaged, lost)
    SetCopyStatus {
        book_id: Uuid,
        copy_id: Uuid,
        status: String,
    },
    /// Remove a title and its reservations
    RemoveBook { book_id: Uuid },
    /// Search the catalog
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Full loan history of a title
    History { book_id: Uuid },
    /// Borrow a book for a user
    Borrow { user_id: Uuid, book_id: Uuid },
    /// Return a loan
    Return { loan_id: Uuid },
    /// Reserve a fully checked-out book
    Reserve { user_id: Uuid, book_id: Uuid },
    /// Cancel a reservation
    CancelReservation { reservation_id: Uuid },
    /// Notify the next reservation holder of a book
    Notify { book_id: Uuid },
    /// Rate a borrowed book, optionally with a comment
    Rate {
        user_id: Uuid,
        book_id: Uuid,
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Print reader comments for a book
    Reviews { book_id: Uuid },
    /// Most borrowed books
    Popular {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Library-wide statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblion={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let store = JsonStore::new(&config.storage.path);
    let mut service = LibraryService::new(store)?;

    match cli.command {
        Command::AddUser {
            username,
            password,
            admin,
            subscription,
            days,
        } => {
            let kind: SubscriptionType =
                subscription.parse().map_err(anyhow::Error::msg)?;
            let user = service.create_user(&username, &password, admin, kind, days)?;
            println!("created user {} ({})", user.username, user.id);
        }
        Command::ChangeSubscription {
            user_id,
            subscription,
            days,
        } => {
            let kind: SubscriptionType =
                subscription.parse().map_err(anyhow::Error::msg)?;
            service.change_subscription(user_id, kind, days)?;
            let user = service.get_user(user_id)?;
            println!(
                "subscription now {} until {}",
                user.subscription.kind, user.subscription.expires_at
            );
        }
        Command::PayPenalties { user_id } => {
            service.pay_penalties(user_id)?;
            println!("penalties settled");
        }
        Command::Notifications { user_id } => {
            let notifications = service.take_notifications(user_id)?;
            if notifications.is_empty() {
                println!("no notifications");
            }
            for message in notifications {
                println!("- {}", message);
            }
        }
        Command::Loans { user_id, active } => {
            for loan in service.get_user_loans(user_id, active)? {
                let title = service
                    .get_book(loan.book_id)
                    .map(|b| b.title.clone())
                    .unwrap_or_else(|_| "unknown title".to_string());
                let status = match loan.returned_at {
                    Some(date) => format!("returned {}", date),
                    None => format!("due {}", loan.due_date),
                };
                println!("{}  {}  borrowed {}  {}", loan.id, title, loan.borrowed_at, status);
            }
        }
        Command::AddBook {
            title,
            author,
            category,
            copies,
        } => {
            let book = service.add_book(&title, &author, &category, copies)?;
            println!("added '{}' ({}) with {} copies", book.title, book.id, copies);
        }
        Command::AddCopies { book_id, count } => {
            service.add_copies(book_id, count)?;
            println!("added {} copies", count);
        }
        Command::SetCopyStatus {
            book_id,
            copy_id,
            status,
        } => {
            let status: CopyStatus = status.parse().map_err(anyhow::Error::msg)?;
            service.set_copy_status(book_id, copy_id, status)?;
            println!("copy {} is now {}", copy_id, status);
        }
        Command::RemoveBook { book_id } => {
            service.remove_book(book_id)?;
            println!("book removed");
        }
        Command::Search {
            query,
            category,
            author,
        } => {
            for book in service.search_books(&query, category.as_deref(), author.as_deref()) {
                let available = book
                    .copies
                    .iter()
                    .filter(|c| c.status == CopyStatus::Available)
                    .count();
                let rating = book
                    .average_rating()
                    .map(|r| format!("  rated {:.1}", r))
                    .unwrap_or_default();
                println!(
                    "{}  {} - {} [{}]  ({}/{} available){}",
                    book.id,
                    book.title,
                    book.author,
                    book.category,
                    available,
                    book.copies.len(),
                    rating
                );
            }
        }
        Command::History { book_id } => {
            for loan in service.book_history(book_id)? {
                println!(
                    "{}  user {}  borrowed {}  {}",
                    loan.id,
                    loan.user_id,
                    loan.borrowed_at,
                    match loan.returned_at {
                        Some(date) => format!("returned {}", date),
                        None => "active".to_string(),
                    }
                );
            }
        }
        Command::Borrow { user_id, book_id } => {
            let loan = service.borrow_book(user_id, book_id)?;
            println!("loan {} created, due {}", loan.id, loan.due_date);
        }
        Command::Return { loan_id } => {
            service.return_book(loan_id)?;
            let loan = service.get_loan(loan_id)?;
            if loan.penalty_applied > rust_decimal::Decimal::ZERO {
                println!("returned with a {} late penalty", loan.penalty_applied);
            } else {
                println!("returned");
            }
        }
        Command::Reserve { user_id, book_id } => {
            let reservation = service.reserve_book(user_id, book_id)?;
            println!("reservation {} created", reservation.id);
        }
        Command::CancelReservation { reservation_id } => {
            service.cancel_reservation(reservation_id)?;
            println!("reservation cancelled");
        }
        Command::Notify { book_id } => match service.notify_next_reservation(book_id)? {
            Some(reservation) => println!("notified user {}", reservation.user_id),
            None => println!("nothing to notify"),
        },
        Command::Rate {
            user_id,
            book_id,
            rating,
            comment,
        } => {
            service.rate_book(user_id, book_id, rating, &comment)?;
            println!("rating recorded");
        }
        Command::Reviews { book_id } => {
            for comment in service.get_book_reviews(book_id)? {
                println!("{}: {}", comment.user_id, comment.text);
            }
        }
        Command::Popular { limit } => {
            for book in service.popular_books(limit) {
                println!(
                    "{} - {}  ({} loans)",
                    book.title,
                    book.author,
                    book.loan_history.len()
                );
            }
        }
        Command::Stats => {
            let stats = service.statistics();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
