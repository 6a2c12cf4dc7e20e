//! Console front end
//!
//! Stands in for the DOM views: prints renders through [`crate::ConsoleUi`]
//! and forwards user intents as bus events, the same contract a browser
//! front end would use.

use crate::app::App;
use shared::events::AppEvent;
use shared::models::{OrderField, PaymentMethod};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  show <id>        open a product preview
  add <id>         put a product in the basket
  rm <id>          remove a product from the basket
  basket           open the basket
  checkout         open the delivery form
  pay <online|cash>  pick the payment method
  address <text>   set the delivery address
  contacts         open the contact form
  email <text>     set the contact email
  phone <text>     set the contact phone
  submit           place the order
  close            close the current modal
  reload           refetch the catalog
  quit             exit";

/// Read commands from stdin until EOF or `quit`.
pub async fn run(app: &App) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "show" => app.emit(AppEvent::CardSelected { id: rest.into() }),
            "add" => app.emit(AppEvent::BasketToggled {
                id: rest.into(),
                included: true,
            }),
            "rm" => app.emit(AppEvent::BasketToggled {
                id: rest.into(),
                included: false,
            }),
            "basket" => app.emit(AppEvent::BasketOpened),
            "checkout" => app.emit(AppEvent::OrderOpened),
            "pay" => match rest {
                "online" => app.emit(AppEvent::PaymentChanged {
                    method: PaymentMethod::Online,
                }),
                "cash" => app.emit(AppEvent::PaymentChanged {
                    method: PaymentMethod::Cash,
                }),
                _ => println!("usage: pay <online|cash>"),
            },
            "address" => app.emit(AppEvent::OrderFieldChanged {
                field: OrderField::Address,
                value: rest.into(),
            }),
            "contacts" => app.emit(AppEvent::ContactsOpened),
            "email" => app.emit(AppEvent::ContactFieldChanged {
                field: OrderField::Email,
                value: rest.into(),
            }),
            "phone" => app.emit(AppEvent::ContactFieldChanged {
                field: OrderField::Phone,
                value: rest.into(),
            }),
            "submit" => {
                // The submit button is this view's, so wait for the result
                // instead of going through the spawned contacts:submit path.
                if let Err(err) = app.submit_order().await {
                    println!("submit failed: {err}");
                }
            }
            "close" => app.emit(AppEvent::ModalClosed),
            "reload" => {
                if let Err(err) = app.load_catalog().await {
                    println!("reload failed: {err}");
                }
            }
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            _ => println!("unknown command, try 'help'"),
        }
    }

    Ok(())
}
