//! Console rendering of an evaluation report.

use crate::runner::EvalReport;

/// Print the run summary to stdout.
pub fn print_summary(report: &EvalReport) {
    let metadata = &report.metadata;
    let averages = &report.averages;

    println!("\n{}", "=".repeat(80));
    println!("EVALUATION REPORT - NOURAI");
    println!("{}", "=".repeat(80));

    println!("\nGENERAL SUMMARY:");
    println!("   Total cases: {}", metadata.total_test_cases);
    println!("   Successful: {}", metadata.successful_cases);
    println!("   Coverage: {:.1}%", metadata.coverage_percentage);
    println!("   Avg latency: {:.2}s", metadata.average_latency_seconds);

    println!("\nRETRIEVAL METRICS:");
    println!("   Precision: {:.3} ({:.1}%)", averages.precision, averages.precision * 100.0);
    println!("   Recall: {:.3} ({:.1}%)", averages.recall, averages.recall * 100.0);

    println!("\nBLEU SCORES (n-gram precision):");
    println!("   BLEU-1: {:.3}", averages.bleu.bleu_1);
    println!("   BLEU-2: {:.3}", averages.bleu.bleu_2);
    println!("   BLEU-3: {:.3}", averages.bleu.bleu_3);
    println!("   BLEU-4: {:.3}", averages.bleu.bleu_4);
    println!(
        "   BLEU Avg: {:.3} ({:.1}%)",
        averages.bleu.bleu_avg,
        averages.bleu.bleu_avg * 100.0
    );

    println!("\nROUGE SCORES (text similarity):");
    println!(
        "   ROUGE-1 F1: {:.3} ({:.1}%)",
        averages.rouge.rouge_1.f1,
        averages.rouge.rouge_1.f1 * 100.0
    );
    println!(
        "   ROUGE-2 F1: {:.3} ({:.1}%)",
        averages.rouge.rouge_2.f1,
        averages.rouge.rouge_2.f1 * 100.0
    );
    println!(
        "   ROUGE-L F1: {:.3} ({:.1}%)",
        averages.rouge.rouge_l.f1,
        averages.rouge.rouge_l.f1 * 100.0
    );

    println!("\n{}\n", "=".repeat(80));
}
