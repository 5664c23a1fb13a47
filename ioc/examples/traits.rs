use strand_ioc::{Container, TypeDescriptor};
use std::sync::Arc;

// Services are looked up by alias and stored type-erased, so a trait object is
// registered and resolved as `Arc<dyn Trait>`.
trait Notifier: Send + Sync {
  fn notify(&self, message: &str) -> String;
}

struct EmailNotifier {
  sender: String,
}

impl Notifier for EmailNotifier {
  fn notify(&self, message: &str) -> String {
    format!("email from {}: {}", self.sender, message)
  }
}

struct Signup {
  notifier: Arc<Arc<dyn Notifier>>,
}

fn main() {
  let container = Container::new();

  // The concrete implementation is chosen at registration time.
  let notifier: Arc<dyn Notifier> = Arc::new(EmailNotifier {
    sender: "noreply@example.com".to_string(),
  });
  container.register_instance("Notifier", notifier);

  // `notifier` has no declared type; the doc block annotation points at the alias.
  container.define(
    TypeDescriptor::new("Signup")
      .untyped("notifier")
      .doc("/** @param Notifier $notifier */")
      .constructor(|args| {
        Ok(Signup {
          notifier: args.get("notifier")?,
        })
      }),
  );
  container.register("Signup", None, false);

  let signup = container.resolve_as::<Signup>("Signup").unwrap();
  let sent = signup.notifier.notify("welcome aboard");
  println!("{}", sent);
  assert_eq!(sent, "email from noreply@example.com: welcome aboard");
}
