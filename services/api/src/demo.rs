use crate::infra::{
    attach_statement, load_application, sample_business_details, sample_loan_details,
};
use clap::Args;
use loan_wizard::config::AppConfig;
use loan_wizard::error::AppError;
use loan_wizard::workflows::loan_application::{
    check_application, ApplicationPatch, HttpSubmissionGateway, IntakeError,
    LoanApplicationWizard, SimulatedSubmissionGateway, SubmissionGateway, ValidationIssue,
    WizardError,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Credit score entered on the loan step. Below 700 the demo adds guarantors.
    #[arg(long, default_value_t = 650)]
    pub(crate) credit_score: u16,
    /// Submit to this endpoint instead of the configured gateway.
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Application payload (camelCase JSON)
    pub(crate) file: PathBuf,
    /// Bank statement to attach before validating (PDF, JPEG or PNG); repeatable
    #[arg(long = "statement")]
    pub(crate) statements: Vec<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let endpoint = args.endpoint.or(config.submission.endpoint);

    println!("Business loan wizard demo");
    let mut wizard = LoanApplicationWizard::new();

    println!("\nStep 1: {}", wizard.step().label());
    if wizard.next().is_err() {
        println!("Next pressed on an empty form:");
        render_issues(wizard.banner());
    }

    wizard.apply(ApplicationPatch::BusinessDetails(sample_business_details()))?;
    let step = wizard.next()?;
    let business = &wizard.data().business_details;
    println!(
        "- {} | GSTIN {} | {} director(s)",
        business.business_name,
        business.gstin,
        business.directors.len()
    );

    println!("\nStep 2: {}", step.label());
    let full_details = sample_loan_details(args.credit_score);
    println!(
        "- Credit score {} ({})",
        args.credit_score,
        full_details.credit_band().label()
    );
    if full_details.requires_guarantors() {
        let mut partial = full_details.clone();
        partial.guarantors.clear();
        partial.bank_statements.clear();
        wizard.apply(ApplicationPatch::LoanDetails(partial))?;
        if wizard.begin_submission().is_err() {
            println!("Submit pressed before adding guarantors:");
            render_issues(wizard.banner());
        }
    }
    wizard.apply(ApplicationPatch::LoanDetails(full_details))?;
    let loan = &wizard.data().loan_details;
    println!(
        "- {} guarantor(s), {} bank statement(s)",
        loan.guarantors.len(),
        loan.bank_statements.len()
    );

    let outcome = match endpoint {
        Some(endpoint) => {
            println!("\nSubmitting to {endpoint}");
            submit(&mut wizard, &HttpSubmissionGateway::new(endpoint)).await
        }
        None => {
            println!(
                "\nSubmitting (simulated, {} ms)",
                config.submission.delay.as_millis()
            );
            submit(
                &mut wizard,
                &SimulatedSubmissionGateway::new(config.submission.delay),
            )
            .await
        }
    };

    if let Some(notification) = wizard.notification() {
        println!("{}", notification.message);
    }
    match outcome {
        Ok(()) => {
            if let Some(receipt) = wizard.receipt() {
                println!(
                    "Reference {} submitted on {}",
                    receipt.reference, receipt.submitted_on
                );
            }
            Ok(())
        }
        Err(WizardError::Submission(_)) => {
            println!("Application kept on step {}", wizard.step().label());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn submit<G>(wizard: &mut LoanApplicationWizard, gateway: &G) -> Result<(), WizardError>
where
    G: SubmissionGateway,
{
    wizard.submit(gateway).await.map(|_| ())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let mut data = load_application(&args.file)?;
    for path in &args.statements {
        attach_statement(&mut data, path)?;
    }

    match check_application(&data) {
        Ok(()) => {
            println!(
                "{}: ready to submit ({}, {} guarantor(s), {} statement(s))",
                args.file.display(),
                data.loan_details.credit_band().label(),
                data.loan_details.guarantors.len(),
                data.loan_details.bank_statements.len()
            );
            Ok(())
        }
        Err(blocked) => {
            println!(
                "{}: blocked on {}",
                args.file.display(),
                blocked.step.label()
            );
            render_issues(&blocked.issues);
            Err(IntakeError::from(blocked).into())
        }
    }
}

fn render_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        println!("  - {}: {}", issue.field, issue.message);
    }
}
